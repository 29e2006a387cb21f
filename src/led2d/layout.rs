//! Compile-time description of panel geometry and wiring.
//!
//! See [`LedLayout`] for examples.

/// Maps each LED of a strip (in wiring order) to its `(x, y)` cell on a `W × H` panel.
///
/// Coordinates use a screen-style convention: `(0, 0)` is the top-left corner,
/// `x` increases to the right, and `y` increases downward.
///
/// Layouts are validated when constructed (at compile time for `const`s):
/// - coordinates must be in-bounds
/// - every `(x, y)` cell must appear exactly once
///
/// # Example
///
/// A 5×5 matrix that snakes across rows, LED 0 at the top-left:
///
/// ```rust
/// use pixel_keypad::led2d::layout::LedLayout;
///
/// const MATRIX: LedLayout<25, 5, 5> = LedLayout::serpentine_row_major();
/// assert_eq!(MATRIX.index_to_xy()[5], (4, 1));
/// assert_eq!(MATRIX.xy_to_index()[5], 9); // (0, 1) is LED 9
/// ```
///
/// ```text
///   LED0   LED1   LED2   LED3   LED4
///   LED9   LED8   LED7   LED6   LED5
///   LED10  LED11  LED12  LED13  LED14
///   ...
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedLayout<const N: usize, const W: usize, const H: usize> {
    map: [(u16, u16); N],
}

impl<const N: usize, const W: usize, const H: usize> LedLayout<N, W, H> {
    /// Return the array mapping LED wiring order to `(x, y)` coordinates.
    #[must_use]
    pub const fn index_to_xy(&self) -> &[(u16, u16); N] {
        &self.map
    }

    /// Number of columns in the layout.
    #[must_use]
    pub const fn width(&self) -> usize {
        W
    }

    /// Number of rows in the layout.
    #[must_use]
    pub const fn height(&self) -> usize {
        H
    }

    /// Total number of LEDs in the layout.
    #[must_use]
    pub const fn len(&self) -> usize {
        N
    }

    /// Always `false`: layouts cover at least one cell.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Inverse mapping: entry `y * W + x` is the strip index of cell `(x, y)`.
    #[must_use]
    pub const fn xy_to_index(&self) -> [u16; N] {
        assert!(
            N <= u16::MAX as usize,
            "total LEDs must fit in u16 for xy_to_index"
        );

        let mut mapping = [0_u16; N];
        let mut led_index = 0;
        while led_index < N {
            let (col, row) = self.map[led_index];
            mapping[row as usize * W + col as usize] = led_index as u16;
            led_index += 1;
        }
        mapping
    }

    /// Const equality helper.
    #[must_use]
    pub const fn equals(&self, other: &Self) -> bool {
        let mut i = 0;
        while i < N {
            if self.map[i].0 != other.map[i].0 || self.map[i].1 != other.map[i].1 {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Constructor: verifies mapping covers every cell exactly once across the W×H panel.
    ///
    /// ```rust
    /// use pixel_keypad::led2d::layout::LedLayout;
    ///
    /// // 3×2 panel (landscape, W×H)
    /// const MAP: LedLayout<6, 3, 2> =
    ///     LedLayout::new([(0, 0), (1, 0), (2, 0), (2, 1), (1, 1), (0, 1)]);
    /// const _: () = assert!(MAP.equals(&LedLayout::serpentine_row_major()));
    /// ```
    #[must_use]
    pub const fn new(map: [(u16, u16); N]) -> Self {
        assert!(W > 0 && H > 0, "W and H must be positive");
        assert!(W * H == N, "W*H must equal N");

        let mut seen = [false; N];

        let mut i = 0;
        while i < N {
            let (c, r) = map[i];
            let c = c as usize;
            let r = r as usize;

            assert!(c < W, "column out of bounds");
            assert!(r < H, "row out of bounds");

            let cell = r * W + c;
            assert!(!seen[cell], "duplicate (col,row) in mapping");
            seen[cell] = true;

            i += 1;
        }

        // N cells, each seen at most once, so every cell is covered.
        Self { map }
    }

    /// Linear mapping for a single-row strip (cols increase left-to-right).
    ///
    /// ```text
    /// 6×1 strip maps to single row:
    ///   LED0  LED1  LED2  LED3  LED4  LED5
    /// ```
    #[must_use]
    pub const fn linear_h() -> Self {
        assert!(H == 1, "linear_h requires H == 1");
        assert!(W == N, "linear_h requires W == N");

        let mut mapping = [(0_u16, 0_u16); N];
        let mut x_index = 0;
        while x_index < W {
            mapping[x_index] = (x_index as u16, 0);
            x_index += 1;
        }
        Self::new(mapping)
    }

    /// Serpentine row-major mapping (alternating left-to-right and right-to-left across rows).
    ///
    /// ```text
    /// Strip snakes across rows (3×2 example):
    ///   LED0  LED1  LED2
    ///   LED5  LED4  LED3
    /// ```
    #[must_use]
    pub const fn serpentine_row_major() -> Self {
        assert!(W > 0 && H > 0, "W and H must be positive");
        assert!(W * H == N, "W*H must equal N");

        let mut mapping = [(0_u16, 0_u16); N];
        let mut y_index = 0;
        while y_index < H {
            let mut x_index = 0;
            while x_index < W {
                let led_index = if y_index % 2 == 0 {
                    y_index * W + x_index
                } else {
                    y_index * W + (W - 1 - x_index)
                };
                mapping[led_index] = (x_index as u16, y_index as u16);
                x_index += 1;
            }
            y_index += 1;
        }
        Self::new(mapping)
    }

    /// Mirror left-to-right.
    #[must_use]
    pub const fn flip_h(self) -> Self {
        let mut mapping = self.map;
        let mut i = 0;
        while i < N {
            let (x, y) = mapping[i];
            mapping[i] = ((W - 1) as u16 - x, y);
            i += 1;
        }
        Self::new(mapping)
    }

    /// Mirror top-to-bottom.
    ///
    /// Matrices mounted with LED 0 at the bottom-left use
    /// `serpentine_row_major().flip_v()`.
    #[must_use]
    pub const fn flip_v(self) -> Self {
        let mut mapping = self.map;
        let mut i = 0;
        while i < N {
            let (x, y) = mapping[i];
            mapping[i] = (x, (H - 1) as u16 - y);
            i += 1;
        }
        Self::new(mapping)
    }
}
