use clap::{ArgAction, Parser};
use pagecat::platform::RawStdout;
use pagecat::{logger, Config, Session};
use std::path::PathBuf;
use std::process::ExitCode;

/// Copy a file to standard output.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// File to copy
    file: PathBuf,

    /// Report buffer geometry and progress on stderr (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Suppress warnings
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // --help and --version land here too and are not failures.
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(e) = logger::init(logger::level_for(args.verbose, args.quiet)) {
        eprintln!("pagecat: cannot install logger: {e}");
    }

    let session = Session::new(Config::default());
    match session.run(&args.file, &mut RawStdout) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pagecat: {e}");
            ExitCode::FAILURE
        }
    }
}
