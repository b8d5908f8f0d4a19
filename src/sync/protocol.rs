//! Wire format of the sync protocol
//!
//! Everything that crosses the HTTP boundary is defined here: the ref
//! advertisement, the fetch negotiation body, the binary object stream and
//! the JSON bodies of ref updates. Client and server share these codecs.
//!
//! The object stream is length-prefixed with network byte order integers:
//! a `u32` object count, then one `u32` frame length before each canonical
//! frame (`<kind> <size>\0<payload>`). Object IDs never travel next to the
//! frames; the receiver recomputes them when it stores each frame, so a
//! corrupted or forged stream cannot plant content under a wrong ID.

use crate::artifacts::branch::branch_name::SymRefName;
use crate::artifacts::core::error::OrbError;
use crate::artifacts::objects::object_id::ObjectId;
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Render the ref advertisement served by `GET /info/refs`
///
/// One line per ref: `<commit-id>\t<refname>`. The caller passes refs
/// already sorted by name.
pub fn render_ref_advertisement(refs: &[(SymRefName, ObjectId)]) -> String {
    refs.iter()
        .map(|(name, oid)| format!("{}\t{}\n", oid, name.as_ref_path()))
        .collect()
}

/// Parse a ref advertisement back into `(refname, commit id)` pairs
pub fn parse_ref_advertisement(text: &str) -> anyhow::Result<Vec<(SymRefName, ObjectId)>> {
    let mut refs = Vec::new();

    for line in text.lines() {
        let (oid, ref_name) = line.split_once('\t').ok_or_else(|| {
            OrbError::ProtocolError(format!("malformed ref advertisement line: {line:?}"))
        })?;
        let oid = ObjectId::try_parse(oid.to_string()).map_err(|e| {
            OrbError::ProtocolError(format!("malformed ref advertisement line {line:?}: {e}"))
        })?;

        refs.push((SymRefName::new(ref_name.to_string()), oid));
    }

    Ok(refs)
}

/// Negotiation body of `POST /objects/fetch`
///
/// `want` lines name the tips the client asks for, `have` lines name tips
/// the client already holds so the server can prune the transfer. The
/// trailing `done` line distinguishes a complete body from a truncated one.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FetchRequest {
    pub wants: Vec<ObjectId>,
    pub haves: Vec<ObjectId>,
}

impl FetchRequest {
    pub fn render(&self) -> String {
        let mut body = String::new();

        for want in &self.wants {
            body.push_str(&format!("want {want}\n"));
        }
        for have in &self.haves {
            body.push_str(&format!("have {have}\n"));
        }
        body.push_str("done\n");

        body
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let mut request = Self::default();
        let mut terminated = false;

        for line in text.lines() {
            if terminated {
                return Err(
                    OrbError::ProtocolError("fetch request continues after done".to_string())
                        .into(),
                );
            }

            match line.split_once(' ') {
                Some(("want", oid)) => request.wants.push(Self::parse_oid_argument(line, oid)?),
                Some(("have", oid)) => request.haves.push(Self::parse_oid_argument(line, oid)?),
                None if line == "done" => terminated = true,
                _ => {
                    return Err(OrbError::ProtocolError(format!(
                        "unrecognized fetch request line: {line:?}"
                    ))
                    .into());
                }
            }
        }

        if !terminated {
            return Err(
                OrbError::ProtocolError("fetch request not terminated by done".to_string()).into(),
            );
        }
        if request.wants.is_empty() {
            return Err(OrbError::ProtocolError("fetch request has no want line".to_string()).into());
        }

        Ok(request)
    }

    fn parse_oid_argument(line: &str, oid: &str) -> anyhow::Result<ObjectId> {
        ObjectId::try_parse(oid.to_string()).map_err(|e| {
            OrbError::ProtocolError(format!("malformed fetch request line {line:?}: {e}")).into()
        })
    }
}

/// Encode canonical object frames into one length-prefixed stream
pub fn encode_object_stream(frames: &[Bytes]) -> anyhow::Result<Vec<u8>> {
    let mut stream = Vec::new();
    stream.write_u32::<byteorder::NetworkEndian>(stream_length(frames.len())?)?;

    for frame in frames {
        stream.write_u32::<byteorder::NetworkEndian>(stream_length(frame.len())?)?;
        stream.extend_from_slice(frame);
    }

    Ok(stream)
}

/// Decode a length-prefixed stream back into canonical object frames
///
/// Only the framing is checked here. Whether each frame is a well-formed
/// object is decided when it is stored, where its ID is recomputed.
pub fn decode_object_stream(stream: &[u8]) -> anyhow::Result<Vec<Bytes>> {
    let mut position = 0usize;
    let count = read_stream_u32(stream, &mut position, "object count")? as usize;

    let mut frames = Vec::new();
    for index in 0..count {
        let frame_length =
            read_stream_u32(stream, &mut position, &format!("length of object {index}"))? as usize;

        if stream.len() - position < frame_length {
            return Err(OrbError::ProtocolError(format!(
                "object stream truncated inside object {index} of {count}"
            ))
            .into());
        }

        frames.push(Bytes::copy_from_slice(
            &stream[position..position + frame_length],
        ));
        position += frame_length;
    }

    if position != stream.len() {
        return Err(OrbError::ProtocolError(format!(
            "object stream carries {} bytes beyond the advertised {count} objects",
            stream.len() - position
        ))
        .into());
    }

    Ok(frames)
}

fn stream_length(length: usize) -> anyhow::Result<u32> {
    u32::try_from(length)
        .map_err(|_| anyhow::anyhow!("length {length} does not fit a stream header"))
}

fn read_stream_u32(stream: &[u8], position: &mut usize, what: &str) -> anyhow::Result<u32> {
    if stream.len() - *position < 4 {
        return Err(
            OrbError::ProtocolError(format!("object stream truncated before {what}")).into(),
        );
    }

    let value = byteorder::NetworkEndian::read_u32(&stream[*position..*position + 4]);
    *position += 4;

    Ok(value)
}

/// JSON body of `POST /refs/update`
///
/// `old` is the value the client last observed for the ref, `None` meaning
/// the ref must not exist yet. The server compares and swaps against it.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefUpdateRequest {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub old: Option<String>,
    pub new: String,
}

/// JSON body answering `POST /refs/update`
#[derive(Debug, Serialize, Deserialize)]
pub struct RefUpdateResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// JSON body answering `POST /objects/push`
#[derive(Debug, Serialize, Deserialize)]
pub struct PushResponse {
    pub applied: usize,
}
