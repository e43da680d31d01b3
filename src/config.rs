use crate::{
    cli::{Args, OutputFormat},
    error::KhistError,
    input::Input,
    kmer::KmerLength,
};

/// Validated run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub k: KmerLength,
    pub input: Input,
    pub format: OutputFormat,
    pub quiet: bool,
}

impl Config {
    pub fn new(k: usize, input: Input, format: OutputFormat) -> Result<Config, KhistError> {
        Ok(Config {
            k: KmerLength::new(k)?,
            input,
            format,
            quiet: false,
        })
    }
}

impl TryFrom<Args> for Config {
    type Error = KhistError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let mut config = Config::new(args.k, Input::from_option(args.path.as_deref()), args.format)?;
        config.quiet = args.quiet;
        Ok(config)
    }
}
