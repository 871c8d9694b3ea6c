use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use mcsprims_session::{CheckinResult, Connection, Sender, SessionConfig};
use mcsprims_transport::{McsStream, TcpConnector};
use tracing::{info, warn};

use crate::cmd::ListenArgs;
use crate::exit::{session_error, CliError, CliResult, INTERNAL, SUCCESS, USAGE};
use crate::output::{print_data_message, OutputFormat};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    if !args.plaintext {
        return Err(CliError::new(
            USAGE,
            format!(
                "listen connects to {}:{} over plain TCP and would send the security token \
                 unencrypted; pass --plaintext to confirm",
                args.host, args.port
            ),
        ));
    }

    let config = SessionConfig {
        host: args.host.clone(),
        port: args.port,
        ..SessionConfig::default()
    };

    let mut conn = Connection::<McsStream, McsStream>::connect(&TcpConnector::new(), &config)
        .map_err(|err| session_error("connect failed", err))?;
    let sender = conn.sender();
    let stopping = Arc::new(AtomicBool::new(false));
    install_ctrlc_handler(sender.clone(), stopping.clone())?;

    let printed = Arc::new(AtomicUsize::new(0));
    {
        let sender = sender.clone();
        let stopping = stopping.clone();
        let printed = printed.clone();
        let category = args.category.clone();
        let count = args.count;
        conn.set_data_message_handler(move |stanza| {
            if category.as_deref().is_some_and(|c| c != stanza.category) {
                return;
            }
            print_data_message(stanza, format);
            let seen = printed.fetch_add(1, Ordering::SeqCst) + 1;
            if count.is_some_and(|limit| seen >= limit) {
                stop(&sender, &stopping);
            }
        });
    }

    conn.send_login_request(&CheckinResult::new(args.android_id, args.security_token))
        .map_err(|err| session_error("login failed", err))?;

    match conn.run_receive_loop() {
        Ok(never) => match never {},
        Err(err) if err.is_connection_closed() && stopping.load(Ordering::SeqCst) => {
            info!(
                received = printed.load(Ordering::SeqCst),
                "listener stopped"
            );
            Ok(SUCCESS)
        }
        Err(err) => Err(session_error("receive failed", err)),
    }
}

fn stop(sender: &Sender<McsStream>, stopping: &AtomicBool) {
    if stopping.swap(true, Ordering::SeqCst) {
        return;
    }
    if let Err(err) = sender.close() {
        warn!(error = %err, "failed to close connection");
    }
}

fn install_ctrlc_handler(sender: Sender<McsStream>, stopping: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || stop(&sender, &stopping)).map_err(|err| {
        CliError::new(INTERNAL, format!("signal handler setup failed: {err}"))
    })
}
