/// Errors raised while configuring a windowed list.
///
/// Scroll and viewport inputs are clamped rather than rejected, so the only failure is a
/// contract breach caught when options are built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    /// Rows must have a positive height for offset/index math to be defined.
    #[error("item height must be greater than zero")]
    ZeroItemHeight,
}
