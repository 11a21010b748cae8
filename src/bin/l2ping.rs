use std::process;

use clap::Parser;
use l2ping::cli::ProberArgs;
use l2ping::frames::probe_frame::ETHERTYPE;
use l2ping::link::system::SystemLink;
use l2ping::link::LinkLayer;
use l2ping::prober::session::{ProbeSession, Statistics};
use l2ping::prober::Prober;
use l2ping::{logging, shutdown, Error};

#[tokio::main]
async fn main() {
    let args = ProberArgs::parse();
    logging::init(args.verbose);

    match probe(&args).await {
        Ok(stats) => process::exit(stats.exit_code()),
        Err(err) => {
            eprintln!("l2ping: {err}");
            process::exit(1);
        }
    }
}

async fn probe(args: &ProberArgs) -> Result<Statistics, Error> {
    let link = SystemLink;
    let interface = link.resolve_interface(&args.interface)?;
    let source = link.local_mac(&interface)?;
    // the configuration is checked before the socket is opened
    let session = ProbeSession::new(args.probe_config(), interface, source)?;
    let channel = link.open_channel(&session.interface, ETHERTYPE)?;

    let cancel = shutdown::cancel_on_interrupt();
    Prober::new(session, channel, cancel).run().await
}
