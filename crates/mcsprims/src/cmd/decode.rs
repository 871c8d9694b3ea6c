use std::io::Read;

use bytes::{Buf, BytesMut};
use mcsprims_frame::{decode_frame, FrameConfig};
use mcsprims_proto::McsMessage;
use tracing::debug;

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, proto_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_records, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let data = read_input(&args)?;
    let config = FrameConfig {
        max_payload_size: args.max_payload,
        ..FrameConfig::default()
    };

    let mut buf = BytesMut::from(data.as_slice());
    let Some(&version) = buf.first() else {
        return Err(CliError::new(DATA_INVALID, "capture is empty"));
    };
    config
        .check_version(version)
        .map_err(|err| frame_error("bad stream header", err))?;
    buf.advance(1);
    debug!(version, "stream version accepted");

    let mut records = Vec::new();
    let outcome = loop {
        match decode_frame(&mut buf, config.max_payload_size) {
            Ok(Some(frame)) => match McsMessage::from_frame(&frame) {
                Ok(message) => records.push((frame.payload.len(), message)),
                Err(err) => break Err(proto_error("decode failed", err)),
            },
            Ok(None) if buf.is_empty() => break Ok(SUCCESS),
            Ok(None) => {
                break Err(CliError::new(
                    DATA_INVALID,
                    format!("capture ends mid-frame ({} bytes left)", buf.len()),
                ))
            }
            Err(err) => break Err(frame_error("decode failed", err)),
        }
    };

    // Records decoded before a failure are still shown.
    print_records(&records, format);
    outcome
}

fn read_input(args: &DecodeArgs) -> CliResult<Vec<u8>> {
    if args.path.as_os_str() == "-" {
        let mut data = Vec::new();
        std::io::stdin()
            .read_to_end(&mut data)
            .map_err(|err| io_error("read stdin failed", err))?;
        return Ok(data);
    }
    std::fs::read(&args.path)
        .map_err(|err| io_error(&format!("read {} failed", args.path.display()), err))
}
