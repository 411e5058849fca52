//! Exporting a table: resolving rows one at a time and laying them out until the page
//! runs out.

use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::model::{ModelHeader, open_scope};
use crate::state::TableProgress;
use crate::table::model::Table;
use crate::table::resolver::{ResolvedCell, ResolvedRow, TableResolver};
use crate::template::{ExportContext, ExportStatus, ExportTemplate};
use tabulate_layout::{OverflowAction, Rect, Size};
use tabulate_render_core::{Coordinates, EntityKind, RenderableEntity};
use tabulate_style::{AttributeSet, ColumnWidth, Height, OverflowPolicy};
use tabulate_types::geometry::EPSILON;
use tabulate_types::{ModelKind, Orientation};

impl Table {
    /// Resolved width of every column, in render order.
    pub fn column_widths(&self, header: &ModelHeader, config: &ExportConfig) -> Vec<f32> {
        let table_width = header.attributes.get_as::<ColumnWidth>();
        self.columns
            .iter()
            .map(|column| {
                column
                    .attributes
                    .get_as::<ColumnWidth>()
                    .and_then(|w| w.width)
                    .or_else(|| table_width.and_then(|w| w.width))
                    .unwrap_or(config.default_column_width)
            })
            .collect()
    }

    fn column_attributes(&self, header: &ModelHeader, ctx: &ExportContext<'_>) -> Vec<AttributeSet> {
        let table = header.attributes.for_target(ModelKind::Column, ctx.constraints);
        self.columns
            .iter()
            .map(|column| {
                table.merged_with(&column.attributes.for_target(ModelKind::Column, ctx.constraints))
            })
            .collect()
    }

    fn open(&self, header: &ModelHeader, ctx: &mut ExportContext<'_>) -> Result<(), ExportError> {
        ctx.emit(
            header
                .entity(EntityKind::TableStart)
                .with_attributes(header.attributes.for_target(ModelKind::Table, ctx.constraints)),
        )?;
        for (column, attributes) in self.columns.iter().zip(self.column_attributes(header, ctx)) {
            ctx.emit(
                header
                    .entity(EntityKind::ColumnStart)
                    .with_name(column.id.clone())
                    .with_attributes(attributes)
                    .at(Coordinates::column(column.position)),
            )?;
        }
        Ok(())
    }

    fn close(&self, header: &ModelHeader, ctx: &mut ExportContext<'_>) -> Result<(), ExportError> {
        for (column, attributes) in self.columns.iter().zip(self.column_attributes(header, ctx)) {
            ctx.emit(
                header
                    .entity(EntityKind::ColumnEnd)
                    .with_name(column.id.clone())
                    .with_attributes(attributes)
                    .at(Coordinates::column(column.position)),
            )?;
        }
        ctx.emit(
            header
                .entity(EntityKind::TableEnd)
                .with_attributes(header.attributes.for_target(ModelKind::Table, ctx.constraints)),
        )
    }

    fn cell_entity(&self, header: &ModelHeader, row: &ResolvedRow, cell: &ResolvedCell) -> RenderableEntity {
        header
            .entity(EntityKind::Cell)
            .with_attributes(cell.attributes.clone())
            .with_value(Some(cell.value.clone()))
            .at(Coordinates::cell(row.index.value, cell.column).with_span(cell.col_span, cell.row_span))
    }

    /// Declared `RowHeight`, else the tallest cell the backend can measure, else the default.
    fn row_height(
        &self,
        header: &ModelHeader,
        ctx: &mut ExportContext<'_>,
        row: &ResolvedRow,
    ) -> Result<f32, ExportError> {
        if let Some(height) = row.declared_height() {
            return Ok(height);
        }
        let mut measured: Option<f32> = None;
        for cell in &row.cells {
            if let Some(size) = ctx.measure_entity(&self.cell_entity(header, row, cell))? {
                measured = Some(measured.map_or(size.height, |h| h.max(size.height)));
            }
        }
        Ok(measured.unwrap_or(ctx.config.default_row_height))
    }

    fn render_row(
        &self,
        header: &ModelHeader,
        ctx: &mut ExportContext<'_>,
        row: &ResolvedRow,
        widths: &[f32],
        bbox: Rect,
        clipped: bool,
    ) -> Result<(), ExportError> {
        let coordinates = Coordinates::row(row.index.value);
        ctx.emit(
            header
                .entity(EntityKind::RowStart)
                .with_attributes(row.attributes.clone())
                .at(coordinates)
                .with_bbox(bbox)
                .with_clipped(clipped),
        )?;

        let right = ctx.current_bounds()?.right();
        let horizontal = ctx.horizontal_overflow_policy(header);
        let mut cells = Vec::with_capacity(row.cells.len());
        for cell in &row.cells {
            let x = bbox.x + widths[..cell.column].iter().sum::<f32>();
            if x >= right - EPSILON {
                continue;
            }
            let end = (cell.column + cell.col_span).min(widths.len());
            let mut cell_box = Rect::new(x, bbox.y, widths[cell.column..end].iter().sum(), bbox.height);
            let crosses = cell_box.right() > right + EPSILON;
            if crosses {
                if horizontal == Some(OverflowPolicy::Stop) {
                    continue;
                }
                cell_box.width = right - x;
            }
            let entity = self
                .cell_entity(header, row, cell)
                .with_bbox(cell_box)
                .with_clipped(clipped || crosses)
                .on_page(ctx.page());
            ctx.emit(entity.clone())?;
            cells.push(entity);
        }

        ctx.emit(
            header
                .entity(EntityKind::RowEnd)
                .with_attributes(row.attributes.clone())
                .at(coordinates)
                .with_bbox(bbox)
                .with_clipped(clipped)
                .with_cells(cells),
        )?;
        ctx.record_rendered();
        Ok(())
    }

    /// Emits rows until the source runs dry or the layout runs out of space.
    fn export_rows(
        &self,
        header: &ModelHeader,
        ctx: &mut ExportContext<'_>,
        progress: &mut TableProgress,
    ) -> Result<ExportStatus, ExportError> {
        let widths = self.column_widths(header, ctx.config);
        let width: f32 = widths.iter().sum();
        let policy = ctx.overflow_policy(header);

        loop {
            let row = match progress.pending.take() {
                Some(row) => row,
                None => {
                    let source = ctx.sources.source_mut(self.source.as_deref())?;
                    match progress.resolver.resolve(self, progress.next, source) {
                        Some(row) => row,
                        None => return Ok(ExportStatus::Finished),
                    }
                }
            };

            let height = self.row_height(header, ctx, &row)?;
            let layout = ctx.layouts.current_mut()?;
            let placement = layout.place_size(Size::new(width, height));

            let (bbox, clipped, last) = if placement.overflows() {
                match layout.resolve_overflow(header.id, &placement, policy) {
                    OverflowAction::Stop => return Ok(ExportStatus::Stopped),
                    OverflowAction::RenderAndFinish(clipped) => (clipped, true, true),
                    OverflowAction::RenderAndContinue(clipped) => (clipped, true, false),
                    OverflowAction::Retry(_) => {
                        log::debug!(
                            "Table '{}': row {} deferred to the next page",
                            header.name,
                            row.index.value
                        );
                        ctx.record_retry(height);
                        progress.pending = Some(row);
                        return Ok(ExportStatus::Suspended);
                    }
                }
            } else {
                (placement.bbox, false, false)
            };

            self.render_row(header, ctx, &row, &widths, bbox, clipped)?;
            progress.next = row.index.next();
            if last {
                return Ok(ExportStatus::Finished);
            }
        }
    }
}

impl ExportTemplate for Table {
    /// The sum of column widths by the declared height, if any. Rows are sized as they
    /// are resolved.
    fn measure(
        &self,
        header: &ModelHeader,
        ctx: &mut ExportContext<'_>,
        available: Size,
    ) -> Result<Size, ExportError> {
        let width = self.column_widths(header, ctx.config).iter().sum();
        let height = header
            .attributes
            .get_as::<Height>()
            .and_then(|h| h.value)
            .and_then(|d| d.resolve(available.height))
            .unwrap_or(0.0);
        Ok(Size::new(width, height))
    }

    fn export(
        &self,
        header: &ModelHeader,
        ctx: &mut ExportContext<'_>,
    ) -> Result<ExportStatus, ExportError> {
        let mut progress = match ctx.states.take_table(header.id) {
            Some(progress) => progress,
            None => TableProgress::new(TableResolver::new(self, &header.attributes, ctx.constraints)),
        };
        if !progress.opened {
            self.open(header, ctx)?;
            progress.opened = true;
        }

        open_scope(header, ctx, Orientation::Vertical)?;
        let status = self.export_rows(header, ctx, &mut progress)?;
        ctx.layouts.close()?;

        match status {
            ExportStatus::Suspended => ctx.states.store_table(header.id, progress),
            ExportStatus::Finished | ExportStatus::Stopped => {
                log::debug!(
                    "Table '{}' done after {} record(s)",
                    header.name,
                    progress.resolver.consumed()
                );
                self.close(header, ctx)?;
            }
        }
        Ok(status)
    }
}
