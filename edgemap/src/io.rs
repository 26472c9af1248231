//! Matrix I/O: image decode/encode and delimited text dumps.
//!
//! These are the only places the pipeline touches the filesystem. Decoding
//! maps any failure to an [`InputError`] so the pipeline can short-circuit
//! before a stage runs; encoding and dumping map failures to [`OutputError`].

use image::{GrayImage, Luma};
use ndarray::{Array2, ArrayView2};
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{InputError, OutputError};

/// Converts an ndarray view of u8 values to an image::GrayImage
///
/// Array indices [y, x] map to pixel coordinates (x, y). Note that array
/// dimensions are (height, width) while image dimensions are (width, height).
///
/// # Arguments
/// * `arr` - Grayscale pixel values
///
/// # Returns
/// * A new GrayImage containing the same data as the input array
pub fn array2_to_gray_image(arr: &ArrayView2<u8>) -> GrayImage {
    let (height, width) = arr.dim();
    let mut img = GrayImage::new(width as u32, height as u32);

    for ((y, x), &value) in arr.indexed_iter() {
        img.put_pixel(x as u32, y as u32, Luma([value]));
    }

    img
}

/// Converts an image::GrayImage to an ndarray Array2<u8> of shape (height, width)
pub fn gray_image_to_array2(img: &GrayImage) -> Array2<u8> {
    let (width, height) = img.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
        img.get_pixel(x as u32, y as u32)[0]
    })
}

/// Decode an image file into an intensity matrix in [0, 255].
///
/// Color images are converted to 8-bit luminance.
///
/// # Errors
/// * `InputError::Decode` if the file is missing, unreadable or in an unsupported format
/// * `InputError::Empty` if the decoded image has a zero dimension
pub fn load_intensity(path: &Path) -> Result<Array2<u8>, InputError> {
    let decoded = image::open(path).map_err(|source| InputError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let matrix = gray_image_to_array2(&decoded.to_luma8());
    let (rows, cols) = matrix.dim();
    if rows == 0 || cols == 0 {
        return Err(InputError::Empty { rows, cols });
    }

    log::debug!("Decoded {} as {}x{} intensity matrix", path.display(), cols, rows);
    Ok(matrix)
}

/// Encode a mask (or any 8-bit matrix) as an image file.
///
/// The format is chosen from the file extension.
pub fn save_mask(mask: &ArrayView2<u8>, path: &Path) -> Result<(), OutputError> {
    array2_to_gray_image(mask)
        .save(path)
        .map_err(|source| OutputError::Encode {
            path: path.to_path_buf(),
            source,
        })
}

/// Write a matrix as comma-separated text.
///
/// One row per line, no header, no delimiter after the last column.
pub fn write_matrix_csv<T: Display>(matrix: &ArrayView2<T>, path: &Path) -> Result<(), OutputError> {
    let io_err = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);

    for row in matrix.rows() {
        let mut first = true;
        for value in row.iter() {
            if !first {
                write!(writer, ",").map_err(io_err)?;
            }
            write!(writer, "{value}").map_err(io_err)?;
            first = false;
        }
        writeln!(writer).map_err(io_err)?;
    }

    writer.flush().map_err(io_err)
}
