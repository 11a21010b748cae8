use std::process;

use clap::{CommandFactory, Parser};
use l2ping::cli::ResponderArgs;
use l2ping::link::system::SystemLink;
use l2ping::responder::supervisor::Supervisor;
use l2ping::{logging, shutdown};

#[tokio::main]
async fn main() {
    let args = ResponderArgs::parse();
    if args.help {
        ResponderArgs::command().print_help().unwrap_or(());
        process::exit(1);
    }
    logging::init(args.verbose);

    // every interface must be usable before any responder starts
    let cancel = shutdown::cancel_on_interrupt();
    let supervisor = match Supervisor::setup(&SystemLink, &args.interfaces, &cancel) {
        Ok(supervisor) => supervisor,
        Err(err) => {
            eprintln!("l2pingd: {err}");
            process::exit(1);
        }
    };

    println!(
        "answering on {}",
        supervisor.interfaces().collect::<Vec<_>>().join(", ")
    );
    for (name, stats) in supervisor.run().await {
        println!("{name}: {stats}");
    }
}
