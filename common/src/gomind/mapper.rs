use crate::gomind::coordinate::Coordinate;

pub const CANVAS_WIDTH: f64 = 512.0;
pub const CANVAS_HEIGHT: f64 = 480.0;

// Share of the canvas taken by one cell and by one stone sprite
const TILE_RATIO: f64 = 0.052;
const STONE_RATIO: f64 = 0.05;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Geometry {
    pub width: f64,
    pub height: f64,
    pub tile_width: f64,
    pub tile_height: f64,
    pub stone_width: f64,
    pub stone_height: f64,
    // Pixel position of the top-left corner of cell (0, 0)
    pub origin_x: f64,
    pub origin_y: f64,
}

impl Geometry {
    pub fn for_canvas(width: f64, height: f64) -> Self {
        Geometry {
            width,
            height,
            tile_width: width * TILE_RATIO,
            tile_height: height * TILE_RATIO,
            stone_width: width * STONE_RATIO,
            stone_height: height * STONE_RATIO,
            origin_x: 2.0,
            origin_y: 2.0,
        }
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Geometry::for_canvas(CANVAS_WIDTH, CANVAS_HEIGHT)
    }
}

/// Converts between pointer positions and board cells.
///
/// No clamping happens here: a position off the board maps to an off-board
/// [`Coordinate`], which the board rejects when a stone is placed there.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CoordinateMapper {
    geometry: Geometry,
}

impl CoordinateMapper {
    pub fn new(geometry: Geometry) -> Self {
        CoordinateMapper { geometry }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// The cell whose centre is nearest to the given pixel.
    pub fn pixel_to_cell(&self, pixel_x: f64, pixel_y: f64) -> Coordinate {
        let g = &self.geometry;
        let x = ((pixel_x - g.origin_x) / g.tile_width - 0.5).round();
        let y = ((pixel_y - g.origin_y) / g.tile_height - 0.5).round();
        Coordinate::new(cell_index(x), cell_index(y))
    }

    /// Top-left corner of the stone sprite drawn for a cell.
    pub fn cell_to_pixel(&self, coordinate: Coordinate) -> (f64, f64) {
        let g = &self.geometry;
        let x = g.origin_x
            + f64::from(coordinate.x) * g.tile_width
            + (g.tile_width - g.stone_width) / 2.0;
        let y = g.origin_y
            + f64::from(coordinate.y) * g.tile_height
            + (g.tile_height - g.stone_height) / 2.0;
        (x, y)
    }
}

// NaN would otherwise cast to 0, which is a real cell
fn cell_index(v: f64) -> i32 {
    if v.is_finite() {
        v as i32
    } else {
        i32::MIN
    }
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        CoordinateMapper::new(Geometry::default())
    }
}
