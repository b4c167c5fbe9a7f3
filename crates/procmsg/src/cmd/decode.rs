use procmsg_frame::LineReader;

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, CliResult, SUCCESS};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let stdin = std::io::stdin().lock();
    let mut reader = LineReader::new(stdin);
    let mut printed = 0usize;

    while let Some(frame) = reader
        .read_frame()
        .map_err(|err| frame_error("decode failed", err))?
    {
        print_frame(&frame, format);
        printed = printed.saturating_add(1);

        if let Some(count) = args.count {
            if printed >= count {
                return Ok(SUCCESS);
            }
        }
    }

    Ok(SUCCESS)
}
