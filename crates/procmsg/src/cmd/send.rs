use std::io::Write;

use procmsg_frame::{encode_line, Frame, Payload, Rpc};

use crate::cmd::SendArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, SUCCESS, USAGE};

pub fn run(args: SendArgs) -> CliResult<i32> {
    let payload_value = serde_json::from_str(&args.payload)
        .map_err(|err| CliError::new(USAGE, format!("--payload is not valid JSON: {err}")))?;
    let payload = Payload::from_value(payload_value)
        .map_err(|err| CliError::new(USAGE, format!("--payload: {err}")))?;

    let uniqid = args
        .uniqid
        .unwrap_or_else(|| format!("{:016x}", rand::random::<u64>()));
    let rpc = Rpc::new(args.target, payload).with_uniqid(uniqid);
    let line = encode_line(&Frame::from(rpc)).map_err(|err| frame_error("encode failed", err))?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(line.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|err| io_error("write failed", err))?;

    Ok(SUCCESS)
}
