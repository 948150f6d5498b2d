use crate::error::FlowError;
use crate::style::TableStyle;
use crate::surface::Cell;
use crate::units::Pt;

/// How table columns are sized
#[derive(Debug, Default, Clone, PartialEq)]
pub enum ColumnWidths {
    /// The drawing surface sizes each column from its content
    #[default]
    Auto,
    /// The available content width is divided equally between the columns
    Uniform,
    /// One explicit width per column
    Fixed(Vec<Pt>),
}

/// Horizontal placement of a table on the page
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum TablePosition {
    /// Centred between the page edges
    #[default]
    Centred,
    /// Flush with the left margin
    Left,
}

/// Validates that every row has the same number of cells, returning that
/// column count. Ragged input fails fast, before any measurement happens.
pub(crate) fn column_count(rows: &[Vec<String>]) -> Result<usize, FlowError> {
    let expected = rows.first().map(Vec::len).unwrap_or(0);
    for (row, cells) in rows.iter().enumerate() {
        if cells.len() != expected {
            return Err(FlowError::MalformedTable {
                row,
                expected,
                found: cells.len(),
            });
        }
    }
    Ok(expected)
}

/// Resolve a [ColumnWidths] request against the column count and the width
/// available between the margins. [None] leaves sizing to the surface.
pub(crate) fn resolve_widths(
    widths: ColumnWidths,
    columns: usize,
    available: Pt,
) -> Result<Option<Vec<Pt>>, FlowError> {
    match widths {
        ColumnWidths::Auto => Ok(None),
        ColumnWidths::Uniform => Ok(Some(vec![available / columns as f32; columns])),
        ColumnWidths::Fixed(widths) => {
            if widths.len() != columns {
                return Err(FlowError::MalformedTable {
                    row: 0,
                    expected: columns,
                    found: widths.len(),
                });
            }
            Ok(Some(widths))
        }
    }
}

/// Convert raw cell text into the form handed to the drawing surface. With
/// `wrap` set, every cell becomes a wrappable paragraph using the header
/// sub-style for row 0 (when the style has a header) and the body sub-style
/// otherwise. This happens once per table, before any row-count splitting,
/// so that measured heights already reflect wrapping.
pub(crate) fn to_cells(rows: Vec<Vec<String>>, style: &TableStyle, wrap: bool) -> Vec<Vec<Cell>> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            row.into_iter()
                .map(|text| {
                    if !wrap {
                        Cell::Raw(text)
                    } else if i == 0 && style.header {
                        Cell::Wrapped {
                            text,
                            style: style.header_text_style(),
                        }
                    } else {
                        Cell::Wrapped {
                            text,
                            style: style.body_text_style(),
                        }
                    }
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let ragged = rows(&[&["a", "b"], &["c"]]);
        match column_count(&ragged) {
            Err(FlowError::MalformedTable {
                row,
                expected,
                found,
            }) => {
                assert_eq!((row, expected, found), (1, 2, 1));
            }
            other => panic!("expected MalformedTable, got {other:?}"),
        }
        assert_eq!(column_count(&rows(&[&["a", "b"], &["c", "d"]])).unwrap(), 2);
    }

    #[test]
    fn uniform_widths_divide_the_available_space() {
        let widths = resolve_widths(ColumnWidths::Uniform, 4, Pt(400.0)).unwrap();
        assert_eq!(widths, Some(vec![Pt(100.0); 4]));
    }

    #[test]
    fn fixed_widths_must_match_the_column_count() {
        let result = resolve_widths(ColumnWidths::Fixed(vec![Pt(50.0)]), 2, Pt(400.0));
        assert!(matches!(result, Err(FlowError::MalformedTable { .. })));
        assert!(resolve_widths(ColumnWidths::Auto, 2, Pt(400.0))
            .unwrap()
            .is_none());
    }

    #[test]
    fn wrap_applies_the_header_sub_style_to_row_zero_only() {
        let style = TableStyle::default();
        let cells = to_cells(rows(&[&["h"], &["b"]]), &style, true);
        match (&cells[0][0], &cells[1][0]) {
            (
                Cell::Wrapped { style: header, .. },
                Cell::Wrapped { style: body, .. },
            ) => {
                assert_eq!(header.colour, style.header_text_colour);
                assert_eq!(body.colour, style.text_colour);
            }
            other => panic!("expected wrapped cells, got {other:?}"),
        }

        let unwrapped = to_cells(rows(&[&["h"], &["b"]]), &style, false);
        assert!(matches!(unwrapped[0][0], Cell::Raw(_)));
    }

    #[test]
    fn headerless_styles_wrap_row_zero_as_body() {
        let style = TableStyle {
            header: false,
            ..TableStyle::default()
        };
        let cells = to_cells(rows(&[&["h"]]), &style, true);
        match &cells[0][0] {
            Cell::Wrapped { style: cell, .. } => assert_eq!(cell.colour, style.text_colour),
            other => panic!("expected wrapped cell, got {other:?}"),
        }
    }
}
