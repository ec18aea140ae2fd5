/// `pairs` command: list pairs with baselines and coherence.
use crate::cli::OutputCtx;
use crate::cli::args::InputArgs;
use crate::cli::output::write_pairs;
use crate::network::NetworkError;
use crate::types::PairOutput;

/// Run `netplot pairs`.
///
/// # Errors
///
/// Returns `NetworkError` for unreadable or malformed inputs.
pub fn run(args: &InputArgs, ctx: &OutputCtx) -> Result<(), NetworkError> {
    let (network, _) = super::load(args, ctx)?;

    let mut rows = PairOutput::from_network(&network)?;
    if args.nodrop {
        rows.retain(|r| !r.dropped);
    }

    write_pairs(&rows, ctx);
    Ok(())
}
