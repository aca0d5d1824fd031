use canusb_session::{run_dump, CancelToken, DumpConfig};
use tracing::debug;

use crate::cmd::{install_ctrlc_handler, open_adapter, DumpArgs};
use crate::exit::{session_error, CliResult, SUCCESS};
use crate::output::{EventPrinter, OutputFormat};

pub fn run(args: DumpArgs, format: OutputFormat) -> CliResult<i32> {
    let settings = args.adapter.settings()?;
    let mut stream = open_adapter(&args.adapter, &settings)?;

    let cancel = CancelToken::new();
    install_ctrlc_handler(cancel.clone())?;

    let config = DumpConfig {
        max_frame_len: args.max_frame_len,
        count: args.count,
    };
    let mut printer = EventPrinter::new(format);
    let summary = run_dump(&mut stream, &config, &cancel, |event| printer.print(event))
        .map_err(|err| session_error("receive failed", err))?;
    printer.finish();

    debug!(
        frames = summary.frames,
        receive_errors = summary.receive_errors,
        "dump stopped"
    );
    Ok(SUCCESS)
}
