/// `dates` command: list acquisitions with their perpendicular baseline.
use crate::cli::OutputCtx;
use crate::cli::args::InputArgs;
use crate::cli::output::write_acquisitions;
use crate::network::NetworkError;
use crate::types::AcquisitionOutput;

/// Run `netplot dates`.
///
/// # Errors
///
/// Returns `NetworkError` for unreadable or malformed inputs.
pub fn run(args: &InputArgs, ctx: &OutputCtx) -> Result<(), NetworkError> {
    let (network, _) = super::load(args, ctx)?;

    let mut rows = AcquisitionOutput::from_network(&network)?;
    if args.nodrop {
        rows.retain(|r| !r.dropped);
    }

    write_acquisitions(&rows, ctx);
    Ok(())
}
