extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate shlex;
extern crate skim_term;

use std::env;
use std::io::{self, BufReader, IsTerminal};
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use skim_term::prelude::*;
use skim_term::reader::default_command;

//------------------------------------------------------------------------------
fn main() {
    env_logger::builder().format_timestamp_nanos().init();
    if let Err(e) = color_eyre::install() {
        warn!("failed to install error reporting: {e}");
    }

    match real_main() {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            // if downstream pipe is closed, exit silently
            if err
                .downcast_ref::<io::Error>()
                .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
            {
                std::process::exit(0)
            }
            eprintln!("sk-term: {err:?}");
            std::process::exit(2)
        }
    }
}

fn parse_args() -> TermOptions {
    let mut args = Vec::new();

    args.extend(env::args().take(1));
    args.extend(
        env::var("SKIM_TERM_DEFAULT_OPTIONS")
            .ok()
            .and_then(|val| shlex::split(&val))
            .unwrap_or_default(),
    );
    args.extend(env::args().skip(1));

    // usage errors exit with status 2
    TermOptions::parse_from(args)
}

fn real_main() -> Result<i32> {
    let opts = parse_args();
    debug!("options: {opts:?}");

    let skim = Skim::new(&opts, Box::new(Tui::stderr()?))?;

    //------------------------------------------------------------------------------
    // search backend, fed from the pipe or the default command
    let (matcher, _) = Matcher::spawn(skim.handle(), opts.query.as_deref().unwrap_or_default(), !opts.no_sort);
    let mut reader = if io::stdin().is_terminal() {
        Reader::from_command(&default_command(), matcher.sender())?
    } else {
        Reader::spawn(BufReader::new(io::stdin()), matcher.sender())
    };

    //------------------------------------------------------------------------------
    let output = skim.run(CrosstermEvents::new(), Arc::new(matcher))?;
    reader.kill();
    output.write_to(&mut io::stdout().lock(), opts.print_query)?;
    Ok(output.exit_code())
}
