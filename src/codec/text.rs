// Text rendering: `<version>:<header>//<point>`, where both sections are
// lowercase hex broken into dash-separated blocks for copying by hand.

use alloc::string::String;
use alloc::vec::Vec;

use super::wire::{Reader, Writer};
use super::{format, PartFormat};
use crate::config::DASH_BLOCK_WIDTH;
use crate::error::{Error, Result};
use crate::share::Share;

const VERSION_SEPARATOR: char = ':';
const SECTION_SEPARATOR: &str = "//";

impl PartFormat {
    pub fn encode_text(&self, share: &Share) -> Result<String> {
        self.check(share)?;

        let mut header = Writer::new();
        self.write_header(share, &mut header)?;
        let mut point = Writer::new();
        self.write_point(share, &mut point);

        Ok(alloc::format!(
            "{}{}{}{}{}",
            self.version,
            VERSION_SEPARATOR,
            dash(&hex::encode(header.into_bytes())),
            SECTION_SEPARATOR,
            dash(&hex::encode(point.into_bytes())),
        ))
    }

    pub fn decode_text(&self, data: &str) -> Result<Share> {
        if detect_text_version(data)? != self.version {
            return Err(Error::MalformedInput("version tag does not match the format"));
        }

        let (_, body) = data
            .split_once(VERSION_SEPARATOR)
            .ok_or(Error::MalformedInput("missing version separator"))?;
        let (header, point) = body
            .split_once(SECTION_SEPARATOR)
            .ok_or(Error::MalformedInput("missing section separator"))?;

        let header = undash(header)?;
        let mut r = Reader::new(&header);
        let header = self.read_header(&mut r)?;
        r.finish()?;

        let point = undash(point)?;
        let mut r = Reader::new(&point);
        let share = self.read_point(header, &mut r)?;
        r.finish()?;

        Ok(share)
    }
}

/// Reads the version tag: the decimal digits before the first `:`.
pub fn detect_text_version(data: &str) -> Result<u32> {
    let (tag, _) = data
        .split_once(VERSION_SEPARATOR)
        .ok_or(Error::MalformedInput("missing version separator"))?;
    if tag.is_empty() || !tag.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::MalformedInput("version tag is not a number"));
    }
    tag.parse()
        .map_err(|_| Error::MalformedInput("version tag is out of range"))
}

/// Encodes `share` as text with the format of its own version.
pub fn encode_text(share: &Share) -> Result<String> {
    format(share.version())?.encode_text(share)
}

/// Decodes text produced by any known format version.
pub fn decode_text(data: &str) -> Result<Share> {
    let data = data.trim();
    format(detect_text_version(data)?)?.decode_text(data)
}

fn dash(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / DASH_BLOCK_WIDTH);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % DASH_BLOCK_WIDTH == 0 {
            out.push('-');
        }
        out.push(c);
    }
    out
}

// Dashes are for readers only and may sit anywhere.
fn undash(section: &str) -> Result<Vec<u8>> {
    if section.is_empty() {
        return Err(Error::MalformedInput("empty section"));
    }
    if !section.bytes().all(|b| b == b'-' || b.is_ascii_hexdigit()) {
        return Err(Error::MalformedInput("unexpected character"));
    }

    let digits: String = section.chars().filter(|c| *c != '-').collect();
    hex::decode(digits).map_err(|_| Error::MalformedInput("odd number of digits"))
}
