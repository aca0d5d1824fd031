use std::time::Duration;

use canusb_session::{run_inject, CancelToken, InjectConfig, InjectRequest};

use crate::cmd::{install_ctrlc_handler, open_adapter, InjectArgs};
use crate::exit::{session_error, CliResult, SUCCESS};
use crate::output::{print_inject_summary, OutputFormat};

pub fn run(args: InjectArgs, format: OutputFormat) -> CliResult<i32> {
    let settings = args.adapter.settings()?;
    let request = InjectRequest::from_hex(settings.frame_type, &args.id, &args.data)
        .map_err(|err| session_error("invalid injection", err))?;
    let mut stream = open_adapter(&args.adapter, &settings)?;

    let cancel = CancelToken::new();
    install_ctrlc_handler(cancel.clone())?;

    let config = InjectConfig {
        payload_mode: args.payload_mode,
        gap: Duration::from_millis(args.gap),
        count: args.count,
    };
    let summary = run_inject(&mut stream, &request, &config, &cancel)
        .map_err(|err| session_error("inject failed", err))?;

    print_inject_summary(&summary, format);
    Ok(SUCCESS)
}
