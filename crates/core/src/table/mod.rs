//! Tables: columns bound to a data source, declared rows, and the resolver that turns
//! both into attributed rows one index at a time.

pub mod builder;
mod export;
pub mod index;
pub mod model;
pub mod resolver;

pub use builder::{CellBuilder, ColumnBuilder, ColumnRef, RowBuilder, TableBuilder};
pub use index::{RowIndex, RowIndexDef, SourceRow, Step};
pub use model::{Column, RowDef, Table};
pub use resolver::{ResolvedCell, ResolvedRow, TableResolver};

#[cfg(test)]
mod resolver_test;
