use std::{
    fs::File,
    io::{self, Write},
    process::ExitCode,
};

use icuid_core::{CpuInfo, RawData};
use icuid_logging::{log_error, log_info, LogCategory, LogLevel, Logger, set_logger};
use scopeguard::defer;

pub const LOG_CAT : LogCategory = LogCategory::new("Tool");

static LOGGER : Logger = Logger::new();

/// Command line option
struct OptionDesc {
    name:    &'static str,
    argname: Option<&'static str>,
    desc:    &'static str,
}

const OPTIONS : &[OptionDesc] = &[
    OptionDesc { name: "help",   argname: None,           desc: "Print this help message" },
    OptionDesc { name: "output", argname: Some("<file>"), desc: "Redirect output to file" },
    OptionDesc { name: "dump",   argname: Some("[file]"), desc: "Dump raw cpuid data to file/stdout" },
    OptionDesc { name: "data",   argname: Some("[file]"), desc: "Read raw cpuid data from file/stdin" },
];

#[derive(Default, Debug, PartialEq)]
struct Options {
    help:   bool,
    output: Option<String>,
    /// Empty when dumping to stdout
    dump:   Option<String>,
    /// Empty when reading from stdin
    data:   Option<String>,
}

#[derive(Debug, PartialEq)]
enum OptionError {
    Unknown(String),
    MissingArgument(&'static str),
}

impl core::fmt::Display for OptionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            OptionError::Unknown(arg) => write!(f, "Unknown option '{arg}'"),
            OptionError::MissingArgument(name) => write!(f, "Option '--{name}' requires an argument"),
        }
    }
}

fn parse_options<I: Iterator<Item = String>>(args: I) -> Result<Options, OptionError> {
    let mut options = Options::default();
    let mut args = args.peekable();
    while let Some(arg) = args.next() {
        let Some(name) = arg.strip_prefix("--") else {
            return Err(OptionError::Unknown(arg));
        };

        match name {
            "help" => options.help = true,
            "output" => match args.next() {
                Some(file) if !file.starts_with("--") => options.output = Some(file),
                _ => return Err(OptionError::MissingArgument("output")),
            },
            // Optional argument, a missing file means stdin/stdout
            "dump" | "data" => {
                let file = args.next_if(|next| !next.starts_with("--")).unwrap_or_default();
                if name == "dump" {
                    options.dump = Some(file);
                } else {
                    options.data = Some(file);
                }
            },
            _ => return Err(OptionError::Unknown(arg)),
        }
    }
    Ok(options)
}

fn usage() {
    let mut err = io::stderr().lock();
    _ = writeln!(err, "usage: icuid [options]");
    for option in OPTIONS {
        let optstr = format!("--{} {}", option.name, option.argname.unwrap_or(""));
        _ = writeln!(err, " {optstr:<16} {}", option.desc);
    }
}

fn print_summary(out: &mut dyn Write, info: &CpuInfo) -> io::Result<()> {
    writeln!(out, "ICUID - {}", icuid_core::VERSION)?;
    writeln!(out, "===============================")?;
    write!(out, "{info}")
}

fn run(options: &Options, out: &mut dyn Write) -> Result<(), icuid_core::Error> {
    if let Some(dump) = &options.dump {
        let raw = icuid_core::acquire_raw()?;
        return icuid_core::write_raw(&raw, Some(dump.as_str()));
    }

    let raw : Option<RawData> = match &options.data {
        Some(data) => Some(icuid_core::read_raw(Some(data.as_str()))?),
        None => None,
    };
    let info = icuid_core::identify(raw)?;
    print_summary(out, &info).map_err(|err| icuid_core::Error::OpenFailure(err.kind()))
}

fn setup_logger() {
    LOGGER.set_log_to_console(true);
    LOGGER.set_always_flush(true);
    LOGGER.set_max_level(LogLevel::Warning);
    if let Ok(level) = std::env::var("ICUID_LOG") {
        match LogLevel::from_name(&level) {
            Some(level) => LOGGER.set_max_level(level),
            None => {
                _ = writeln!(io::stderr(), "Unknown log level '{level}' in ICUID_LOG");
            },
        }
    }
    set_logger(&LOGGER);
}

fn main() -> ExitCode {
    setup_logger();
    defer!(LOGGER.flush());

    let options = match parse_options(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(err) => {
            _ = writeln!(io::stderr(), "{err}");
            usage();
            return ExitCode::FAILURE;
        },
    };

    if options.help {
        usage();
        return ExitCode::SUCCESS;
    }

    let mut out : Box<dyn Write> = match &options.output {
        Some(path) => match File::create(path) {
            Ok(file) => Box::new(file),
            Err(err) => {
                log_error!(LOG_CAT, main, "Can't open file {path}: {err}");
                _ = writeln!(io::stderr(), "Can't open file {path}");
                return ExitCode::FAILURE;
            },
        },
        None => Box::new(io::stdout().lock()),
    };

    log_info!(LOG_CAT, "Running with {options:?}");
    match run(&options, &mut *out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            _ = writeln!(out, "{err}");
            ExitCode::FAILURE
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> Result<Options, OptionError> {
        parse_options(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    pub fn optional_arguments() {
        let options = parse(&["--dump", "--output", "out.txt"]).expect("options should parse");
        assert_eq!(options.dump.as_deref(), Some(""));
        assert_eq!(options.output.as_deref(), Some("out.txt"));

        let options = parse(&["--data", "raw.txt"]).expect("options should parse");
        assert_eq!(options.data.as_deref(), Some("raw.txt"));
        assert_eq!(parse(&["--data"]).expect("options should parse").data.as_deref(), Some(""));
    }

    #[test]
    pub fn option_errors() {
        assert_eq!(parse(&["--output"]), Err(OptionError::MissingArgument("output")));
        assert_eq!(parse(&["--output", "--help"]), Err(OptionError::MissingArgument("output")));
        assert_eq!(parse(&["--verbose"]), Err(OptionError::Unknown("--verbose".to_string())));
        assert_eq!(parse(&["raw.txt"]), Err(OptionError::Unknown("raw.txt".to_string())));
        assert!(parse(&["--help"]).expect("options should parse").help);
    }
}
