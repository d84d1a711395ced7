use std::io;
use std::io::{ BufWriter, Write };
use std::fs::File;
use std::path::Path;

use crate::color::Color;

/// Maximum length of a line in a PPM file.
const PPM_LINE_WIDTH: usize = 70;

/// A canvas for drawing pixels.
///
/// This structure stores the results of the ray caster. Once the user
/// specifies the desired image width and height, the `Camera` generates rays
/// which are cast onto a `World`'s objects.
///
/// The canvas stores the resultant colors for each pixel ray, row by row.
/// Colors are kept unclamped; clamping happens when the canvas is exported.
///
/// For now, only PPM images are supported.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    /// The pixels of the canvas, stored as a flattened vector.
    pixels: Vec<Color>,
}

impl Canvas {
    /// Creates a new black canvas with specified width and height.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Color::black(); width * height]
        }
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Replaces a whole row of pixels.
    ///
    /// Rows out of bounds are ignored, as are colors past the canvas width.
    pub fn write_row(&mut self, y: usize, row: &[Color]) {
        if y >= self.height {
            return;
        }

        let start = y * self.width;
        let n = row.len().min(self.width);
        self.pixels[start..start + n].copy_from_slice(&row[..n]);
    }

    /// Writes the canvas as a plain PPM (P3) image.
    ///
    /// Channels are clamped to [0, 1] and scaled to 0..=255. Lines in the
    /// pixel data never exceed 70 columns; a value which would cross the
    /// limit starts a new line.
    pub fn to_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        // Write PPM header, as well as metadata
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?; // Maximum color value

        for row in self.pixels.chunks(self.width.max(1)) {
            let mut col = 0;
            for value in row.iter().flat_map(|p| p.to_rgb8()) {
                let token = value.to_string();

                if col == 0 {
                    write!(out, "{}", token)?;
                    col = token.len();
                } else if col + 1 + token.len() > PPM_LINE_WIDTH {
                    write!(out, "\n{}", token)?;
                    col = token.len();
                } else {
                    write!(out, " {}", token)?;
                    col += 1 + token.len();
                }
            }

            writeln!(out)?;
        }

        Ok(())
    }

    /// Saves a canvas to a PPM file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.to_ppm(&mut out)?;
        out.flush()
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. Pixels are specified in row-column
    /// order, where `y` is the row of the pixel, and `x` is the column. Rows
    /// and columns are zero-indexed.
    ///
    /// # Examples
    ///
    /// Writing a pixel to the fourth column, second row on an 8-by-8 canvas:
    ///
    /// ```
    /// # use ray_caster::color::Color;
    /// # use ray_caster::canvas::Canvas;
    /// let purple = Color::rgb(1.0, 0.0, 1.0);
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, &purple);
    /// assert_eq!(canvas.read_pixel(4, 2).unwrap(), purple);
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: &Color) {
        // Silently ignore out-of-bounds pixels
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = *pixel;
    }

    /// Reads a color from a location on the `Canvas`.
    ///
    /// If the specified pixel location is out-of-bounds, `None` is returned.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        // Return nothing if pixel is out-of-bounds
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }
}

#[cfg(test)]
fn ppm_string(c: &Canvas) -> String {
    let mut buf = Vec::new();
    c.to_ppm(&mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn new_canvas_is_black() {
    let c = Canvas::new(10, 20);

    assert_eq!(c.width, 10);
    assert_eq!(c.height, 20);
    assert_eq!(c.pixels().len(), 200);
    assert!(c.pixels().iter().all(|p| *p == Color::black()));
}

#[test]
fn out_of_bounds_pixels() {
    let mut c = Canvas::new(2, 2);
    c.write_pixel(2, 0, &Color::white());
    c.write_pixel(0, 2, &Color::white());

    assert!(c.pixels().iter().all(|p| *p == Color::black()));
    assert_eq!(c.read_pixel(2, 0), None);
    assert_eq!(c.read_pixel(1, 1), Some(Color::black()));
}

#[test]
fn pixels_are_row_major() {
    let mut c = Canvas::new(3, 2);
    c.write_pixel(1, 1, &Color::white());

    assert_eq!(c.pixels()[4], Color::white());
}

#[test]
fn write_whole_row() {
    let mut c = Canvas::new(2, 2);
    c.write_row(1, &[Color::white(), Color::rgb(0.5, 0.5, 0.5)]);
    c.write_row(2, &[Color::white()]);

    assert_eq!(c.read_pixel(0, 0), Some(Color::black()));
    assert_eq!(c.read_pixel(0, 1), Some(Color::white()));
    assert_eq!(c.read_pixel(1, 1), Some(Color::rgb(0.5, 0.5, 0.5)));
}

#[test]
fn ppm_header() {
    let c = Canvas::new(5, 3);
    let ppm = ppm_string(&c);
    let lines: Vec<&str> = ppm.lines().take(3).collect();

    assert_eq!(lines, vec!["P3", "5 3", "255"]);
}

#[test]
fn ppm_pixel_data() {
    let mut c = Canvas::new(5, 3);
    c.write_pixel(0, 0, &Color::rgb(1.5, 0.0, 0.0));
    c.write_pixel(2, 1, &Color::rgb(0.0, 0.5, 0.0));
    c.write_pixel(4, 2, &Color::rgb(-0.5, 0.0, 1.0));

    let ppm = ppm_string(&c);
    let lines: Vec<&str> = ppm.lines().skip(3).collect();

    assert_eq!(lines, vec![
        "255 0 0 0 0 0 0 0 0 0 0 0 0 0 0",
        "0 0 0 0 0 0 0 128 0 0 0 0 0 0 0",
        "0 0 0 0 0 0 0 0 0 0 0 0 0 0 255",
    ]);
}

#[test]
fn ppm_long_lines_are_split() {
    let mut c = Canvas::new(10, 2);
    for y in 0..2 {
        for x in 0..10 {
            c.write_pixel(x, y, &Color::rgb(1.0, 0.8, 0.6));
        }
    }

    let ppm = ppm_string(&c);
    let lines: Vec<&str> = ppm.lines().skip(3).collect();

    assert_eq!(lines, vec![
        "255 204 153 255 204 153 255 204 153 255 204 153 255 204 153 255 204",
        "153 255 204 153 255 204 153 255 204 153 255 204 153",
        "255 204 153 255 204 153 255 204 153 255 204 153 255 204 153 255 204",
        "153 255 204 153 255 204 153 255 204 153 255 204 153",
    ]);
    assert!(ppm.lines().all(|l| l.len() <= 70));
}

#[test]
fn ppm_ends_with_newline() {
    let c = Canvas::new(5, 3);

    assert!(ppm_string(&c).ends_with('\n'));
}
