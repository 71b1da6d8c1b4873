/// Rectangle extension trait and padded bounds.
pub mod rect;
