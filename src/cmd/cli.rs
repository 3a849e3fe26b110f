use std::path::PathBuf;

#[derive(Debug, Default, Eq, PartialEq)]
pub struct Args {
    pub output_path: Option<PathBuf>,
    pub input_path: Option<PathBuf>,
    pub short_help: bool,
    pub long_help: bool,
    pub version: bool,
}

impl Args {
    pub fn build_from_args<I>(cli_args: I) -> Result<Self, String>
    where
        I: Iterator<Item: AsRef<str> + ToString>,
    {
        let mut args = Self::default();

        for arg in cli_args {
            match arg.as_ref() {
                "-h" => args.short_help = true,
                "--help" => args.long_help = true,
                "-V" | "--version" => args.version = true,
                unknown if unknown.starts_with('-') => {
                    return Err(format!("Unknown option: '{unknown}'"));
                }
                positional if args.output_path.is_none() => {
                    args.output_path = Some(PathBuf::from(positional));
                }
                positional if args.input_path.is_none() => {
                    args.input_path = Some(PathBuf::from(positional));
                }
                extra => {
                    return Err(format!("Unexpected argument: '{extra}'"));
                }
            }
        }

        Ok(args)
    }
}
