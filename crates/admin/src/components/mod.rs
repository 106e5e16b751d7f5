//! Stateless presentation primitives.

pub mod badge;
pub mod charts;
pub mod data_table;
pub mod modal;
pub mod stat_card;

pub use badge::{Badge, Tone};
pub use charts::{Chart, ChartKind, ChartPoint, ChartSeries, format_number};
pub use data_table::{DataTableConfig, RowAction, TableCell, TableRow};
pub use modal::Modal;
pub use stat_card::{StatCard, Trend};
