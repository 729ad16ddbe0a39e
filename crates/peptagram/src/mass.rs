/// Monoisotopic mass of an amino acid residue, or `None` for a character
/// that is not a residue code.
pub fn monoisotopic(residue: u8) -> Option<f64> {
    let mass = match residue {
        b'A' => 71.03711,
        b'R' => 156.10111,
        b'N' => 114.04293,
        b'D' => 115.02694,
        b'C' => 103.00919,
        b'E' => 129.04259,
        b'Q' => 128.05858,
        b'G' => 57.02146,
        b'H' => 137.05891,
        b'I' => 113.08406,
        b'L' => 113.08406,
        b'K' => 128.09496,
        b'M' => 131.04049,
        b'F' => 147.06841,
        b'P' => 97.05276,
        b'S' => 87.03203,
        b'T' => 101.04768,
        b'W' => 186.07931,
        b'Y' => 163.06333,
        b'V' => 99.06841,
        b'U' => 150.95363,
        b'O' => 237.14773,
        _ => return None,
    };
    Some(mass)
}

pub const VALID_AA: [u8; 22] = [
    b'A', b'C', b'D', b'E', b'F', b'G', b'H', b'I', b'K', b'L', b'M', b'N', b'P', b'Q', b'R', b'S',
    b'T', b'V', b'W', b'Y', b'U', b'O',
];

/// Round to 4 decimal places, matching the precision of the stored
/// attributes in the output document. Idempotent.
pub fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}
