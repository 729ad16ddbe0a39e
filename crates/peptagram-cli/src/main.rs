use clap::{Arg, Command, ValueHint};

mod output;
mod tsv;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::default()
        .filter_level(log::LevelFilter::Info)
        .parse_env(env_logger::Env::default().filter_or("PEPTAGRAM_LOG", "info"))
        .init();

    let matches = Command::new("peptagram")
        .version(clap::crate_version!())
        .about("Convert Morpheus search output into a peptagram JSON document")
        .arg(
            Arg::new("protein_groups")
                .required(true)
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help("Path to the protein_groups.tsv file")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("psms")
                .required(true)
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help("Path to the PSMs.tsv file")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("modifications")
                .short('m')
                .long("modifications")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help("Path to the modifications.tsv file")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .default_value("proteins.json")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help("Path where the protein map will be written")
                .value_hint(ValueHint::FilePath),
        )
        .get_matches();

    let protein_groups = tsv::read_tsv(matches.get_one::<String>("protein_groups").unwrap())?;
    let psms = tsv::read_tsv(matches.get_one::<String>("psms").unwrap())?;
    let modifications = matches
        .get_one::<String>("modifications")
        .map(tsv::read_tsv)
        .transpose()?;

    let assembly = peptagram_core::build(&protein_groups, &psms, modifications.as_deref())?;
    output::write_json(
        &assembly.into_map(),
        matches.get_one::<String>("output").unwrap(),
    )?;
    Ok(())
}
