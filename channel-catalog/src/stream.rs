//! Elementary stream descriptions carried by a transport.
//!
//! Stream contents belong to the capture backend; the catalog only looks at
//! them to describe a transport in the logs and in snapshots.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::StreamParseError;

/// Elementary stream type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StreamType {
    Mpeg2Video,
    Mpeg2Audio,
    H264,
    Ac3,
    Aac,
    Teletext,
    Subtitles,
    Ca,
    Pat,
    Pmt,
    MpegTs,
}

impl StreamType {
    /// All stream types, in label table order.
    pub const ALL: [StreamType; 11] = [
        StreamType::Mpeg2Video,
        StreamType::Mpeg2Audio,
        StreamType::H264,
        StreamType::Ac3,
        StreamType::Aac,
        StreamType::Teletext,
        StreamType::Subtitles,
        StreamType::Ca,
        StreamType::Pat,
        StreamType::Pmt,
        StreamType::MpegTs,
    ];

    /// Get the label used in logs and configuration.
    pub fn label(&self) -> &'static str {
        match self {
            StreamType::Mpeg2Video => "MPEG2VIDEO",
            StreamType::Mpeg2Audio => "MPEG2AUDIO",
            StreamType::H264 => "H264",
            StreamType::Ac3 => "AC3",
            StreamType::Aac => "AAC",
            StreamType::Teletext => "TELETEXT",
            StreamType::Subtitles => "SUBTITLES",
            StreamType::Ca => "CA",
            StreamType::Pat => "PAT",
            StreamType::Pmt => "PMT",
            StreamType::MpegTs => "MPEGTS",
        }
    }

    /// Look up a stream type by label, ignoring case.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Get the conditional access system name for a CA system id.
pub fn caid_name(caid: u16) -> &'static str {
    if caid == 0x0005 {
        return "ARIB B-CAS";
    }
    match caid & 0xFF00 {
        0x0100 => "Seca",
        0x0200 => "CCETT",
        0x0300 => "Deutsche Telecom",
        0x0400 => "Eurodec",
        0x0500 => "Viaccess",
        0x0600 => "Irdeto",
        0x0700 => "Jerroldgi",
        0x0800 => "Matra",
        0x0900 => "NDS",
        0x0A00 => "Nokia",
        0x0B00 => "Conax",
        0x0C00 => "NTL",
        0x0D00 => "CryptoWorks",
        0x0E00 => "PowerVu",
        0x0F00 => "Sony",
        0x1000 => "Tandberg",
        0x1100 => "Thompson",
        0x1200 => "TV-Com",
        0x1300 => "HPT",
        0x1400 => "HRT",
        0x1500 => "IBM",
        0x1600 => "Nera",
        0x1700 => "BetaCrypt",
        0x1800 => "NagraVision",
        0x1900 => "Titan",
        0x2000 => "Telefonica",
        0x2100 => "Stentor",
        0x2200 => "Tadiran Scopus",
        0x2300 => "BARCO AS",
        0x2400 => "StarGuide",
        0x2500 => "Mentor",
        0x2600 => "EBU",
        0x4700 => "GI",
        0x4800 => "Telemann",
        _ => "Unknown",
    }
}

/// A single elementary stream of a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stream {
    /// Stream type.
    pub stream_type: StreamType,
    /// Transport-level identifier (PID).
    pub pid: u16,
    /// CA system id, if the stream is scrambled.
    pub caid: Option<u16>,
}

impl Stream {
    /// Create an unscrambled stream.
    pub fn new(stream_type: StreamType, pid: u16) -> Self {
        Self {
            stream_type,
            pid,
            caid: None,
        }
    }

    /// Create a CA stream for the given CA system id.
    pub fn ca(caid: u16, pid: u16) -> Self {
        Self {
            stream_type: StreamType::Ca,
            pid,
            caid: Some(caid),
        }
    }

    /// Name shown for this stream: the CA system name when scrambled,
    /// otherwise the stream type label.
    pub fn describe(&self) -> &'static str {
        match self.caid {
            Some(caid) if caid != 0 => caid_name(caid),
            _ => self.stream_type.label(),
        }
    }

    /// Parse a comma separated stream list.
    ///
    /// Items are `label:pid`, or `ca=<caid>:pid` for CA streams. Numbers are
    /// decimal or `0x` prefixed hex. Blank items are ignored.
    pub fn parse_list(list: &str) -> Result<Vec<Stream>, StreamParseError> {
        list.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| item.parse::<Stream>())
            .collect()
    }
}

impl FromStr for Stream {
    type Err = StreamParseError;

    fn from_str(item: &str) -> Result<Self, Self::Err> {
        let (label, pid) = item
            .split_once(':')
            .ok_or_else(|| StreamParseError::Malformed(item.to_string()))?;
        let pid = parse_number(pid.trim())?;
        let label = label.trim();

        if let Some(caid) = label
            .strip_prefix("ca=")
            .or_else(|| label.strip_prefix("CA="))
        {
            return Ok(Stream::ca(parse_number(caid.trim())?, pid));
        }

        let stream_type = StreamType::from_label(label)
            .ok_or_else(|| StreamParseError::UnknownType(label.to_string()))?;
        Ok(Stream::new(stream_type, pid))
    }
}

fn parse_number(s: &str) -> Result<u16, StreamParseError> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse::<u16>(),
    };
    parsed.map_err(|_| StreamParseError::InvalidNumber(s.to_string()))
}
