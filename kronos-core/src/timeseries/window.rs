use crate::table::{TableView, ValidatedTable};

/// Lookback and horizon views over one table.
#[derive(Debug, Clone, Copy)]
pub struct WindowSplit<'a> {
    /// Rows `[0, L)`, clamped to the table length.
    pub lookback: TableView<'a>,
    /// Rows `[L, L+P)`, clamped to the table length.
    pub horizon: TableView<'a>,
    /// True iff the table is strictly longer than `L + P`.
    pub has_ground_truth: bool,
}

impl<'a> WindowSplit<'a> {
    /// Horizon rows usable as ground truth, if the gating rule admits them.
    #[must_use]
    pub const fn ground_truth(&self) -> Option<TableView<'a>> {
        if self.has_ground_truth {
            Some(self.horizon)
        } else {
            None
        }
    }
}

/// Split `table` into a lookback of `lookback` rows and a horizon of
/// `pred_len` rows.
///
/// Out-of-range bounds clamp rather than fail. Ground truth requires
/// `table.len() > lookback + pred_len`; a table of exactly `lookback + pred_len`
/// rows yields a full horizon but no ground truth.
#[must_use]
pub fn slice_windows(table: &ValidatedTable, lookback: usize, pred_len: usize) -> WindowSplit<'_> {
    let horizon_end = lookback.saturating_add(pred_len);
    WindowSplit {
        lookback: table.view(0..lookback),
        horizon: table.view(lookback..horizon_end),
        has_ground_truth: table.len() > horizon_end,
    }
}
