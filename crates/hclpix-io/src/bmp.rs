//! BMP image format support
//!
//! Reads and writes uncompressed 24 and 32 bpp Windows bitmaps with a
//! 40-byte `BITMAPINFOHEADER`.
//!
//! # Layout
//!
//! A 14-byte file header and a 40-byte info header are followed (possibly
//! after a gap) by bottom-up pixel rows. 24 bpp rows hold B, G, R triples
//! padded to a multiple of 4 bytes; 32 bpp rows hold B, G, R, A quads and
//! need no padding.
//!
//! Pixel data is streamed through a buffer of [`PIXEL_BUFFER_SIZE`] bytes.
//! A chunk never ends inside a pixel or inside a row's padding, so every
//! chunk decodes on its own.

use crate::pixel::{ExtractorSet, Packer};
use crate::{IoError, IoResult, ReadLimits};
use hclpix_core::{DataFormat, Image, Planes, PlanesMut, Sample, pixel_count};
use log::{debug, trace, warn};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;

/// BMP file header size
const BMP_FILE_HEADER_SIZE: usize = 14;

/// BMP info header size (BITMAPINFOHEADER)
const BMP_INFO_HEADER_SIZE: u32 = 40;

/// Combined size of both headers; the default pixel data offset
pub const BMP_HEADER_SIZE: usize = BMP_FILE_HEADER_SIZE + BMP_INFO_HEADER_SIZE as usize;

/// Capacity of the streaming pixel buffer
pub const PIXEL_BUFFER_SIZE: usize = 4 * 1024;

/// Resolution written into new files, in pixels per meter
const DEFAULT_RESOLUTION: i32 = 4000;

/// Parsed BMP headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpHeader {
    /// Total file size declared in the file header
    pub file_size: u32,
    /// Offset of the pixel data from the start of the file
    pub pixel_offset: u32,
    /// Size of the info header
    pub info_size: u32,
    /// Width in pixels
    pub width: i32,
    /// Height in pixels; bottom-up rows when positive
    pub height: i32,
    /// Number of color planes
    pub planes: u16,
    /// Bits per pixel
    pub bits_per_pixel: u16,
    /// Compression method (0 is uncompressed)
    pub compression: u32,
    /// Declared size of the pixel data
    pub bitmap_size: u32,
    /// Horizontal resolution in pixels per meter
    pub x_pixels_per_meter: i32,
    /// Vertical resolution in pixels per meter
    pub y_pixels_per_meter: i32,
    /// Number of palette colors
    pub colors_used: u32,
    /// Number of important colors
    pub colors_important: u32,
}

fn le_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn le_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn le_i32(bytes: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

impl BmpHeader {
    /// Headers for a new uncompressed image.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::BadDimension`] if a side is zero, does not fit in
    /// an `i32`, or the file would exceed 4 GiB.
    pub fn for_image(width: u32, height: u32, bits_per_pixel: u16) -> IoResult<Self> {
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(IoError::BadDimension(format!(
                "cannot write a {}x{} bitmap",
                width, height
            )));
        }
        let layout = RowLayout::new(width, bits_per_pixel);
        let too_large = || {
            IoError::BadDimension(format!(
                "{}x{} bitmap exceeds the 4 GiB format limit",
                width, height
            ))
        };
        let bitmap_size = layout
            .bytes_per_row()
            .checked_mul(height as usize)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(too_large)?;
        let file_size = bitmap_size
            .checked_add(BMP_HEADER_SIZE as u32)
            .ok_or_else(too_large)?;

        Ok(Self {
            file_size,
            pixel_offset: BMP_HEADER_SIZE as u32,
            info_size: BMP_INFO_HEADER_SIZE,
            width: width as i32,
            height: height as i32,
            planes: 1,
            bits_per_pixel,
            compression: 0,
            bitmap_size,
            x_pixels_per_meter: DEFAULT_RESOLUTION,
            y_pixels_per_meter: DEFAULT_RESOLUTION,
            colors_used: 0,
            colors_important: 0,
        })
    }

    /// Read and parse both headers, leaving `reader` at byte 54.
    ///
    /// No field is validated here apart from the signature; see
    /// [`BmpHeader::validate`].
    ///
    /// # Errors
    ///
    /// - [`IoError::InvalidFormat`] if the file header is short or does not
    ///   start with `BM`
    /// - [`IoError::UnsupportedFormat`] if the info header is short
    pub fn read_from<R: Read>(reader: &mut R) -> IoResult<Self> {
        let mut file_header = [0u8; BMP_FILE_HEADER_SIZE];
        reader
            .read_exact(&mut file_header)
            .map_err(|e| IoError::InvalidFormat(format!("truncated file header: {}", e)))?;

        if &file_header[0..2] != b"BM" {
            return Err(IoError::InvalidFormat("not a BMP file".to_string()));
        }

        let mut info = [0u8; BMP_INFO_HEADER_SIZE as usize];
        reader
            .read_exact(&mut info)
            .map_err(|e| IoError::UnsupportedFormat(format!("truncated info header: {}", e)))?;

        Ok(Self {
            file_size: le_u32(&file_header, 2),
            pixel_offset: le_u32(&file_header, 10),
            info_size: le_u32(&info, 0),
            width: le_i32(&info, 4),
            height: le_i32(&info, 8),
            planes: le_u16(&info, 12),
            bits_per_pixel: le_u16(&info, 14),
            compression: le_u32(&info, 16),
            bitmap_size: le_u32(&info, 20),
            x_pixels_per_meter: le_i32(&info, 24),
            y_pixels_per_meter: le_i32(&info, 28),
            colors_used: le_u32(&info, 32),
            colors_important: le_u32(&info, 36),
        })
    }

    /// Serialize both headers.
    pub fn to_bytes(&self) -> [u8; BMP_HEADER_SIZE] {
        let mut out = [0u8; BMP_HEADER_SIZE];
        out[0..2].copy_from_slice(b"BM");
        out[2..6].copy_from_slice(&self.file_size.to_le_bytes());
        // 6..10: reserved
        out[10..14].copy_from_slice(&self.pixel_offset.to_le_bytes());
        out[14..18].copy_from_slice(&self.info_size.to_le_bytes());
        out[18..22].copy_from_slice(&self.width.to_le_bytes());
        out[22..26].copy_from_slice(&self.height.to_le_bytes());
        out[26..28].copy_from_slice(&self.planes.to_le_bytes());
        out[28..30].copy_from_slice(&self.bits_per_pixel.to_le_bytes());
        out[30..34].copy_from_slice(&self.compression.to_le_bytes());
        out[34..38].copy_from_slice(&self.bitmap_size.to_le_bytes());
        out[38..42].copy_from_slice(&self.x_pixels_per_meter.to_le_bytes());
        out[42..46].copy_from_slice(&self.y_pixels_per_meter.to_le_bytes());
        out[46..50].copy_from_slice(&self.colors_used.to_le_bytes());
        out[50..54].copy_from_slice(&self.colors_important.to_le_bytes());
        out
    }

    /// Check that this is a bitmap the codec can decode.
    ///
    /// Checks run in header order and stop at the first failure. Limits are
    /// skipped when `limits` is `None`.
    ///
    /// # Errors
    ///
    /// - [`IoError::UnsupportedFormat`] for an info header other than 40
    ///   bytes, a non-positive side, more than one plane, a depth other than
    ///   24 or 32, or compression
    /// - [`IoError::BadDimension`] if a side exceeds `limits`
    pub fn validate(&self, limits: Option<&ReadLimits>) -> IoResult<()> {
        if self.info_size != BMP_INFO_HEADER_SIZE {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported BMP header size: {}",
                self.info_size
            )));
        }

        if self.width <= 0 {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported BMP width: {}",
                self.width
            )));
        }
        if let Some(limits) = limits
            && self.width as u32 > limits.max_width
        {
            return Err(IoError::BadDimension(format!(
                "width {} exceeds maximum {}",
                self.width, limits.max_width
            )));
        }

        if self.height <= 0 {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported BMP height: {}",
                self.height
            )));
        }
        if let Some(limits) = limits
            && self.height as u32 > limits.max_height
        {
            return Err(IoError::BadDimension(format!(
                "height {} exceeds maximum {}",
                self.height, limits.max_height
            )));
        }

        if self.planes != 1 {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported number of planes: {}",
                self.planes
            )));
        }

        if self.bits_per_pixel != 24 && self.bits_per_pixel != 32 {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported BMP bit depth: {}",
                self.bits_per_pixel
            )));
        }

        if self.compression != 0 {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported BMP compression: {}",
                self.compression
            )));
        }

        Ok(())
    }

    /// Width in pixels; only meaningful after [`BmpHeader::validate`].
    pub fn width(&self) -> u32 {
        self.width as u32
    }

    /// Height in pixels; only meaningful after [`BmpHeader::validate`].
    pub fn height(&self) -> u32 {
        self.height as u32
    }

    fn layout(&self) -> RowLayout {
        RowLayout::new(self.width(), self.bits_per_pixel)
    }
}

/// Byte layout of one pixel row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RowLayout {
    bytes_per_pixel: usize,
    pixel_bytes: usize,
    pad_bytes: usize,
}

impl RowLayout {
    fn new(width: u32, bits_per_pixel: u16) -> Self {
        let bytes_per_pixel = bits_per_pixel as usize / 8;
        let pixel_bytes = bytes_per_pixel * width as usize;
        let pad_bytes = (4 - pixel_bytes % 4) % 4;
        Self {
            bytes_per_pixel,
            pixel_bytes,
            pad_bytes,
        }
    }

    fn bytes_per_row(&self) -> usize {
        self.pixel_bytes + self.pad_bytes
    }

    /// Length of the next read chunk.
    ///
    /// Starts from `min(capacity, remaining)` and backs off so the chunk ends
    /// on a pixel boundary or at the end of a row's pixels, leaving a
    /// partially covered padding run for the next chunk.
    fn read_chunk_len(&self, consumed: usize, remaining: usize, capacity: usize) -> usize {
        let len = capacity.min(remaining);
        let end_in_row = (consumed + len) % self.bytes_per_row();
        let len = if end_in_row < self.pixel_bytes {
            len - end_in_row % self.bytes_per_pixel
        } else {
            len - (end_in_row - self.pixel_bytes)
        };
        debug_assert!(len > 0);
        len
    }

    /// Packed word of the pixel starting at `bytes[0]`.
    #[inline]
    fn word_at(&self, bytes: &[u8]) -> u32 {
        if self.bytes_per_pixel == 4 {
            u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
        } else {
            u32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0xff])
        }
    }
}

/// Allocate the streaming buffer without aborting on failure.
fn alloc_pixel_buffer() -> IoResult<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(PIXEL_BUFFER_SIZE)
        .map_err(|_| IoError::AllocFailed(PIXEL_BUFFER_SIZE))?;
    buffer.resize(PIXEL_BUFFER_SIZE, 0);
    Ok(buffer)
}

fn check_format<T: Sample>(format: DataFormat) -> IoResult<()> {
    format
        .check_sample_kind(T::KIND)
        .map_err(|e| IoError::InvalidArgument(e.to_string()))
}

/// Skip from the end of the headers to the pixel data.
fn seek_to_pixels<R: Seek>(reader: &mut R, header: &BmpHeader) -> IoResult<()> {
    let offset = header.pixel_offset as usize;
    if offset > BMP_HEADER_SIZE {
        trace!("Skipping {} bytes to pixel data", offset - BMP_HEADER_SIZE);
        reader
            .seek(SeekFrom::Current((offset - BMP_HEADER_SIZE) as i64))
            .map_err(IoError::Seek)?;
    } else if offset < BMP_HEADER_SIZE {
        warn!(
            "Pixel data offset {} points inside the headers, reading from {}",
            offset, BMP_HEADER_SIZE
        );
    }
    Ok(())
}

/// Fail with a short read when fewer than `needed` bytes follow the cursor.
fn check_remaining<R: Seek>(reader: &mut R, needed: u64) -> IoResult<()> {
    let pos = reader.stream_position().map_err(IoError::Seek)?;
    let end = reader.seek(SeekFrom::End(0)).map_err(IoError::Seek)?;
    reader.seek(SeekFrom::Start(pos)).map_err(IoError::Seek)?;

    let available = end.saturating_sub(pos);
    if available < needed {
        return Err(IoError::Read(std::io::Error::new(
            ErrorKind::UnexpectedEof,
            format!(
                "pixel data needs {} bytes, only {} available",
                needed, available
            ),
        )));
    }
    Ok(())
}

/// BMP reader bound to a data format.
///
/// Construction checks the format against `T` and allocates the streaming
/// buffer, so both failures surface before any stream is touched.
#[derive(Debug)]
pub struct BmpDecoder<T> {
    format: DataFormat,
    buffer: Vec<u8>,
    _sample: PhantomData<T>,
}

impl<T: Sample> BmpDecoder<T> {
    /// Create a decoder for `format`.
    ///
    /// # Errors
    ///
    /// - [`IoError::InvalidArgument`] if `format` does not match `T`
    /// - [`IoError::AllocFailed`] if the streaming buffer cannot be allocated
    pub fn new(format: DataFormat) -> IoResult<Self> {
        check_format::<T>(format)?;
        Ok(Self {
            format,
            buffer: alloc_pixel_buffer()?,
            _sample: PhantomData,
        })
    }

    /// Read and validate the headers, then position `reader` at the pixels.
    fn read_header<R: Read + Seek>(reader: &mut R, limits: &ReadLimits) -> IoResult<BmpHeader> {
        let header = BmpHeader::read_from(reader)?;
        header.validate(Some(limits))?;

        trace!("Width: {}", header.width);
        trace!("Height: {}", header.height);
        trace!("Bit depth: {}", header.bits_per_pixel);
        trace!("Pixel offset: {}", header.pixel_offset);

        seek_to_pixels(reader, &header)?;
        Ok(header)
    }

    /// Stream all pixel rows from `reader` into `extractors`.
    fn read_pixels<R: Read>(
        &mut self,
        reader: &mut R,
        header: &BmpHeader,
        extractors: &mut ExtractorSet<'_, T>,
    ) -> IoResult<()> {
        let layout = header.layout();
        let bytes_per_row = layout.bytes_per_row();
        let total = bytes_per_row * header.height() as usize;
        let mut consumed = 0usize;
        let mut chunks = 0usize;

        while consumed < total {
            let len = layout.read_chunk_len(consumed, total - consumed, self.buffer.len());
            let chunk = &mut self.buffer[..len];
            reader.read_exact(chunk).map_err(IoError::Read)?;

            let mut row_byte = consumed % bytes_per_row;
            let mut offset = 0usize;
            while offset < len {
                if row_byte < layout.pixel_bytes {
                    extractors.extract(layout.word_at(&chunk[offset..]));
                    offset += layout.bytes_per_pixel;
                    row_byte += layout.bytes_per_pixel;
                } else {
                    let pad = bytes_per_row - row_byte;
                    offset += pad;
                    row_byte += pad;
                }
                if row_byte == bytes_per_row {
                    row_byte = 0;
                }
            }

            consumed += len;
            chunks += 1;
        }

        debug!(
            "Read {} bytes of pixel data in {} chunks ({} pixels)",
            total,
            chunks,
            extractors.position()
        );
        Ok(())
    }

    /// Decode into caller-supplied planes.
    ///
    /// Absent planes are skipped. Present planes must hold at least
    /// `width * height` samples. A 24 bpp source yields opaque alpha.
    ///
    /// # Returns
    ///
    /// The image's `(width, height)`.
    ///
    /// # Errors
    ///
    /// - header errors as described on [`BmpHeader::read_from`] and
    ///   [`BmpHeader::validate`]
    /// - [`IoError::BadDimension`] if a plane is too small
    /// - [`IoError::Seek`] / [`IoError::Read`] on stream failures
    pub fn decode_into<R: Read + Seek>(
        &mut self,
        mut reader: R,
        limits: &ReadLimits,
        planes: PlanesMut<'_, T>,
    ) -> IoResult<(u32, u32)> {
        let header = Self::read_header(&mut reader, limits)?;
        let n = pixel_count(header.width(), header.height())?;
        planes
            .check_len(n)
            .map_err(|e| IoError::BadDimension(e.to_string()))?;

        let mut extractors = ExtractorSet::new(self.format, planes);
        self.read_pixels(&mut reader, &header, &mut extractors)?;
        Ok((header.width(), header.height()))
    }

    /// Decode into a newly allocated [`Image`].
    ///
    /// The image gets an alpha plane when the source is 32 bpp. The stream
    /// must hold all declared pixel bytes before the image is allocated.
    ///
    /// # Errors
    ///
    /// - as for [`BmpDecoder::decode_into`]
    /// - [`IoError::Read`] if the stream ends before the declared pixel data
    /// - [`IoError::Core`] reporting allocation failure if the image planes
    ///   cannot be allocated
    pub fn decode<R: Read + Seek>(
        &mut self,
        mut reader: R,
        limits: &ReadLimits,
    ) -> IoResult<Image<T>> {
        let header = Self::read_header(&mut reader, limits)?;
        let needed = header.layout().bytes_per_row() as u64 * u64::from(header.height());
        check_remaining(&mut reader, needed)?;

        let mut image =
            Image::try_new(header.width(), header.height(), header.bits_per_pixel == 32)?;

        let mut extractors = ExtractorSet::new(self.format, image.planes_mut());
        self.read_pixels(&mut reader, &header, &mut extractors)?;
        Ok(image)
    }
}

/// BMP writer bound to a data format and a set of input planes.
///
/// Construction validates everything about the input, so a writer that
/// exists can only fail on the stream itself.
#[derive(Debug)]
pub struct BmpEncoder<'a, T> {
    format: DataFormat,
    header: BmpHeader,
    c0: &'a [T],
    c1: &'a [T],
    c2: &'a [T],
    alpha: Option<&'a [T]>,
    buffer: Vec<u8>,
}

impl<'a, T: Sample> BmpEncoder<'a, T> {
    /// Create an encoder for a `width x height` image.
    ///
    /// Output is 32 bpp when `planes.alpha` is present and 24 bpp otherwise.
    /// The three primary planes are required.
    ///
    /// # Errors
    ///
    /// - [`IoError::InvalidArgument`] if `format` does not match `T` or a
    ///   primary plane is missing
    /// - [`IoError::BadDimension`] for empty or oversized images, or planes
    ///   shorter than `width * height`
    /// - [`IoError::AllocFailed`] if the streaming buffer cannot be allocated
    pub fn new(
        format: DataFormat,
        width: u32,
        height: u32,
        planes: Planes<'a, T>,
    ) -> IoResult<Self> {
        check_format::<T>(format)?;
        let (Some(c0), Some(c1), Some(c2)) = (planes.c0, planes.c1, planes.c2) else {
            return Err(IoError::InvalidArgument(
                "all three color planes are required".to_string(),
            ));
        };

        let bits_per_pixel = if planes.alpha.is_some() { 32 } else { 24 };
        let header = BmpHeader::for_image(width, height, bits_per_pixel)?;
        let n = pixel_count(width, height)?;
        planes
            .check_len(n)
            .map_err(|e| IoError::BadDimension(e.to_string()))?;

        Ok(Self {
            format,
            header,
            c0,
            c1,
            c2,
            alpha: planes.alpha,
            buffer: alloc_pixel_buffer()?,
        })
    }

    /// Headers that [`BmpEncoder::encode`] will emit.
    pub fn header(&self) -> &BmpHeader {
        &self.header
    }

    /// Write the headers and pixel data to `writer`.
    ///
    /// Fields (a pixel, or one row's padding) are appended to the buffer only
    /// if they fit entirely; the buffer is flushed before the first one that
    /// does not.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Write`] on a short write.
    pub fn encode<W: Write>(&mut self, mut writer: W) -> IoResult<()> {
        let header = self.header;
        writer
            .write_all(&header.to_bytes())
            .map_err(IoError::Write)?;

        let layout = header.layout();
        let bpp = layout.bytes_per_pixel;
        let capacity = self.buffer.len();
        let mut packer = Packer::new(self.format, self.c0, self.c1, self.c2, self.alpha);
        let mut filled = 0usize;
        let mut chunks = 0usize;

        for _ in 0..header.height() {
            for _ in 0..header.width() {
                if filled + bpp > capacity {
                    writer
                        .write_all(&self.buffer[..filled])
                        .map_err(IoError::Write)?;
                    filled = 0;
                    chunks += 1;
                }
                let word = packer.pack().to_le_bytes();
                self.buffer[filled..filled + bpp].copy_from_slice(&word[..bpp]);
                filled += bpp;
            }

            if layout.pad_bytes > 0 {
                if filled + layout.pad_bytes > capacity {
                    writer
                        .write_all(&self.buffer[..filled])
                        .map_err(IoError::Write)?;
                    filled = 0;
                    chunks += 1;
                }
                self.buffer[filled..filled + layout.pad_bytes].fill(0);
                filled += layout.pad_bytes;
            }
        }

        if filled > 0 {
            writer
                .write_all(&self.buffer[..filled])
                .map_err(IoError::Write)?;
            chunks += 1;
        }
        writer.flush().map_err(IoError::Write)?;

        debug!(
            "Wrote {}x{} {} bpp bitmap: {} bytes of pixel data in {} chunks",
            header.width,
            header.height,
            header.bits_per_pixel,
            header.bitmap_size,
            chunks
        );
        Ok(())
    }
}

/// Read a BMP image into caller-supplied planes.
///
/// # Errors
///
/// See [`BmpDecoder::new`] and [`BmpDecoder::decode_into`].
pub fn read_bmp_into<R: Read + Seek, T: Sample>(
    reader: R,
    format: DataFormat,
    limits: &ReadLimits,
    planes: PlanesMut<'_, T>,
) -> IoResult<(u32, u32)> {
    BmpDecoder::new(format)?.decode_into(reader, limits, planes)
}

/// Read a BMP image into a newly allocated [`Image`].
///
/// # Errors
///
/// See [`BmpDecoder::new`] and [`BmpDecoder::decode`].
pub fn read_bmp<R: Read + Seek, T: Sample>(
    reader: R,
    format: DataFormat,
    limits: &ReadLimits,
) -> IoResult<Image<T>> {
    BmpDecoder::new(format)?.decode(reader, limits)
}

/// Write a BMP image from caller-supplied planes.
///
/// # Errors
///
/// See [`BmpEncoder::new`] and [`BmpEncoder::encode`].
pub fn write_bmp<W: Write, T: Sample>(
    writer: W,
    format: DataFormat,
    width: u32,
    height: u32,
    planes: Planes<'_, T>,
) -> IoResult<()> {
    BmpEncoder::new(format, width, height, planes)?.encode(writer)
}

/// Write an [`Image`] as BMP.
///
/// # Errors
///
/// As for [`write_bmp`].
pub fn write_bmp_image<W: Write, T: Sample>(
    writer: W,
    format: DataFormat,
    image: &Image<T>,
) -> IoResult<()> {
    write_bmp(writer, format, image.width(), image.height(), image.planes())
}
