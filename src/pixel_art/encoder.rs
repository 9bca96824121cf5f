//! # 像素画文本编码
//!
//! 网格按行输出，每个符号一个字形，每行（包括最后一行）以 `\n` 结尾。
//! 输出是网格的确定性函数，直接作为二维码载荷。

use super::classifier::DEFAULT_SYMBOL;
use super::color::{GRID_SIZE, Symbol, SymbolGrid};
use crate::generator::GeneratorError;

/// 像素画：符号网格及其文本载荷。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelArt {
    pub symbols: SymbolGrid,
    pub payload: String,
}

impl PixelArt {
    pub fn from_symbols(symbols: SymbolGrid) -> Self {
        let payload = encode(&symbols);
        Self { symbols, payload }
    }
}

/// 将符号网格编码为多行文本。
pub fn encode(grid: &SymbolGrid) -> String {
    let capacity = grid
        .iter()
        .flatten()
        .map(|symbol| symbol.glyph().len())
        .sum::<usize>()
        + GRID_SIZE;
    let mut payload = String::with_capacity(capacity);

    for row in grid {
        for symbol in row {
            payload.push_str(symbol.glyph());
        }
        payload.push('\n');
    }

    payload
}

/// 将文本载荷解析回符号网格。
///
/// 末尾换行可有可无；行数或每行字形数不是 `GRID_SIZE` 时返回错误。
pub fn parse(payload: &str) -> Result<SymbolGrid, GeneratorError> {
    let body = payload.strip_suffix('\n').unwrap_or(payload);
    let lines: Vec<&str> = body.split('\n').collect();

    if lines.len() != GRID_SIZE {
        return Err(GeneratorError::InvalidFormat(format!(
            "像素画行数错误：{}（应为 {}）",
            lines.len(),
            GRID_SIZE
        )));
    }

    let mut grid = [[DEFAULT_SYMBOL; GRID_SIZE]; GRID_SIZE];
    for (row_index, line) in lines.iter().enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let mut rest = line;
        let mut column = 0;

        while !rest.is_empty() {
            let (symbol, consumed) = Symbol::from_glyph_prefix(rest).ok_or_else(|| {
                GeneratorError::InvalidFormat(format!(
                    "第 {} 行第 {} 列包含未知字形",
                    row_index + 1,
                    column + 1
                ))
            })?;

            if column >= GRID_SIZE {
                return Err(GeneratorError::InvalidFormat(format!(
                    "第 {} 行字形过多（应为 {}）",
                    row_index + 1,
                    GRID_SIZE
                )));
            }

            grid[row_index][column] = symbol;
            column += 1;
            rest = &rest[consumed..];
        }

        if column != GRID_SIZE {
            return Err(GeneratorError::InvalidFormat(format!(
                "第 {} 行字形数量错误：{}（应为 {}）",
                row_index + 1,
                column,
                GRID_SIZE
            )));
        }
    }

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn checkerboard() -> SymbolGrid {
        let mut grid = [[Symbol::White; GRID_SIZE]; GRID_SIZE];
        for (y, row) in grid.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                if (x + y) % 2 == 0 {
                    *cell = Symbol::Black;
                }
            }
        }
        grid
    }

    #[test]
    fn encode_emits_one_line_per_row_with_trailing_newline() {
        let payload = encode(&checkerboard());

        assert!(payload.ends_with('\n'));
        assert_eq!(payload.matches('\n').count(), GRID_SIZE);
        assert!(payload.starts_with("\u{2B1B}\u{FE0F}\u{2B1C}\u{FE0F}"));
    }

    #[test]
    fn encode_all_white_grid_matches_reference_text() {
        let payload = encode(&[[Symbol::White; GRID_SIZE]; GRID_SIZE]);
        let row = format!("{}\n", "\u{2B1C}\u{FE0F}".repeat(GRID_SIZE));

        assert_eq!(payload, row.repeat(GRID_SIZE));
    }

    #[test]
    fn parse_reverses_encode() {
        let grid = checkerboard();
        let parsed = parse(&encode(&grid)).expect("payload should parse");

        assert_eq!(parsed, grid);
    }

    #[test]
    fn parse_accepts_missing_trailing_newline() {
        let grid = checkerboard();
        let payload = encode(&grid);
        let trimmed = payload.trim_end_matches('\n');

        assert_eq!(parse(trimmed).expect("payload should parse"), grid);
    }

    #[test]
    fn parse_rejects_wrong_shapes() {
        let short_rows = "\u{1F7E5}\n".repeat(GRID_SIZE);
        assert!(matches!(parse(&short_rows), Err(GeneratorError::InvalidFormat(_))));

        let row = format!("{}\n", "\u{1F7E5}".repeat(GRID_SIZE));
        assert!(matches!(parse(&row.repeat(GRID_SIZE - 1)), Err(GeneratorError::InvalidFormat(_))));

        let long_row = format!("{}\n", "\u{1F7E5}".repeat(GRID_SIZE + 1));
        assert!(matches!(parse(&long_row.repeat(GRID_SIZE)), Err(GeneratorError::InvalidFormat(_))));
    }

    #[test]
    fn parse_rejects_unknown_glyphs() {
        let mut payload = encode(&checkerboard());
        payload.replace_range(0..0, "A");

        assert!(matches!(parse(&payload), Err(GeneratorError::InvalidFormat(_))));
    }

    proptest! {
        #[test]
        fn encoded_payload_is_always_square(cells in prop::collection::vec(0usize..9, GRID_SIZE * GRID_SIZE)) {
            let mut grid = [[Symbol::White; GRID_SIZE]; GRID_SIZE];
            for (index, choice) in cells.iter().enumerate() {
                grid[index / GRID_SIZE][index % GRID_SIZE] = Symbol::ALL[*choice];
            }

            let payload = encode(&grid);
            let lines: Vec<&str> = payload.strip_suffix('\n').unwrap_or(payload.as_str()).split('\n').collect();

            prop_assert_eq!(lines.len(), GRID_SIZE);
            for line in lines {
                let mut rest = line;
                let mut glyphs = 0;
                while let Some((_, consumed)) = Symbol::from_glyph_prefix(rest) {
                    rest = &rest[consumed..];
                    glyphs += 1;
                }
                prop_assert!(rest.is_empty());
                prop_assert_eq!(glyphs, GRID_SIZE);
            }
        }
    }
}
