use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::{Read, Write};
use std::marker::PhantomData;
use std::path::Path;

use log::debug;
use serde::de::{self, DeserializeOwned, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::count_map::{Count, CountMap};
use crate::error::{CorpusError, Result};

const TOTAL: &str = "Total";
const LEN: &str = "Len";

/// Wire formats supported by every frequency structure.
///
/// # Variants
/// - `Json`: self-describing, `{"Total": .., "Len": .., "<Field>": {..}}`
/// - `Binary`: compact `postcard` encoding of the same three fields
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
	#[default]
	Json,
	Binary,
}

impl Encoding {
	/// File extension conventionally used for this encoding.
	pub fn extension(self) -> &'static str {
		match self {
			Encoding::Json => "json",
			Encoding::Binary => "bin",
		}
	}

	/// Guesses the encoding from a file extension.
	pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
		match path.as_ref().extension()?.to_str()? {
			"json" => Some(Encoding::Json),
			"bin" => Some(Encoding::Binary),
			_ => None,
		}
	}
}

/// One level of the frequency hierarchy as seen by the codec.
///
/// Implementors only describe their shape; (de)serialization is shared and
/// generated with `impl_layer_codec!`.
pub(crate) trait Layer: Sized {
	type Value: Count + Serialize + DeserializeOwned;

	/// Struct name reported to serde.
	const NAME: &'static str;
	/// `[Total, Len, <data field>]`
	const FIELDS: &'static [&'static str];

	fn counts(&self) -> &CountMap<Self::Value>;

	fn from_counts(counts: CountMap<Self::Value>) -> Self;
}

pub(crate) const fn fields(data: &'static str) -> [&'static str; 3] {
	[TOTAL, LEN, data]
}

fn data_field<L: Layer>() -> &'static str {
	L::FIELDS[2]
}

pub(crate) fn serialize<L, S>(layer: &L, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
	L: Layer,
	S: Serializer,
{
	let counts = layer.counts();
	let mut state = serializer.serialize_struct(L::NAME, 3)?;
	state.serialize_field(TOTAL, &counts.total())?;
	state.serialize_field(LEN, &counts.len())?;
	state.serialize_field(data_field::<L>(), counts.entries())?;
	state.end()
}

pub(crate) fn deserialize<'de, L, D>(deserializer: D) -> std::result::Result<L, D::Error>
where
	L: Layer,
	D: Deserializer<'de>,
{
	deserializer.deserialize_struct(L::NAME, L::FIELDS, LayerVisitor::<L>(PhantomData))
}

struct LayerVisitor<L>(PhantomData<L>);

impl<L: Layer> LayerVisitor<L> {
	/// `Total` and `Len` are type-checked by the caller but the bookkeeping is
	/// always rebuilt from the data.
	fn build<E: de::Error>(entries: HashMap<String, L::Value>) -> std::result::Result<L, E> {
		Ok(L::from_counts(CountMap::from_entries(entries)))
	}
}

impl<'de, L: Layer> Visitor<'de> for LayerVisitor<L> {
	type Value = L;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "struct {}", L::NAME)
	}

	fn visit_seq<A>(self, mut seq: A) -> std::result::Result<L, A::Error>
	where
		A: SeqAccess<'de>,
	{
		let _total: u64 = seq
			.next_element()?
			.ok_or_else(|| de::Error::invalid_length(0, &self))?;
		let _len: u64 = seq
			.next_element()?
			.ok_or_else(|| de::Error::invalid_length(1, &self))?;
		let entries: HashMap<String, L::Value> = seq
			.next_element()?
			.ok_or_else(|| de::Error::invalid_length(2, &self))?;
		Self::build(entries)
	}

	fn visit_map<A>(self, mut map: A) -> std::result::Result<L, A::Error>
	where
		A: MapAccess<'de>,
	{
		let mut entries: Option<HashMap<String, L::Value>> = None;
		while let Some(key) = map.next_key::<String>()? {
			if key == TOTAL || key == LEN {
				map.next_value::<u64>()?;
			} else if key == data_field::<L>() {
				if entries.is_some() {
					return Err(de::Error::duplicate_field(data_field::<L>()));
				}
				// `null` is how an empty table is written by some producers
				entries = Some(map.next_value::<Option<HashMap<String, L::Value>>>()?.unwrap_or_default());
			} else {
				map.next_value::<IgnoredAny>()?;
			}
		}
		Self::build(entries.unwrap_or_default())
	}
}

/// Generates the serde impls and [`Persist`] for a [`Layer`].
macro_rules! impl_layer_codec {
	($ty:ty) => {
		impl serde::Serialize for $ty {
			fn serialize<S: serde::Serializer>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error> {
				$crate::model::codec::serialize(self, serializer)
			}
		}

		impl<'de> serde::Deserialize<'de> for $ty {
			fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> ::core::result::Result<Self, D::Error> {
				$crate::model::codec::deserialize(deserializer)
			}
		}

		impl $crate::model::codec::Persist for $ty {}
	};
}

pub(crate) use impl_layer_codec;

/// Encodes any serializable value.
pub fn encode<T: Serialize + ?Sized>(value: &T, encoding: Encoding) -> Result<Vec<u8>> {
	match encoding {
		Encoding::Json => serde_json::to_vec(value).map_err(|err| CorpusError::Encode(err.to_string())),
		Encoding::Binary => Ok(postcard::to_stdvec(value)?),
	}
}

/// Decodes a value; nothing is returned on failure.
pub fn decode<T: DeserializeOwned>(bytes: &[u8], encoding: Encoding) -> Result<T> {
	match encoding {
		Encoding::Json => Ok(serde_json::from_slice(bytes)?),
		Encoding::Binary => Ok(postcard::from_bytes(bytes)?),
	}
}

/// Persistence helpers shared by every frequency structure.
///
/// All decoding methods are atomic: on error the target is left untouched.
pub trait Persist: Serialize + DeserializeOwned {
	fn encode(&self, encoding: Encoding) -> Result<Vec<u8>> {
		encode(self, encoding)
	}

	fn decode(bytes: &[u8], encoding: Encoding) -> Result<Self> {
		decode(bytes, encoding)
	}

	/// Replaces `self` with the decoded value, or leaves it unchanged.
	fn decode_into(&mut self, bytes: &[u8], encoding: Encoding) -> Result<()> {
		*self = Self::decode(bytes, encoding)?;
		Ok(())
	}

	fn write_to<W: Write>(&self, mut writer: W, encoding: Encoding) -> Result<()> {
		let bytes = self.encode(encoding)?;
		writer.write_all(&bytes).map_err(|err| CorpusError::io(err, None))?;
		writer.flush().map_err(|err| CorpusError::io(err, None))
	}

	/// Reads the reader to its end and decodes the content.
	fn read_from<R: Read>(mut reader: R, encoding: Encoding) -> Result<Self> {
		let mut bytes = Vec::new();
		reader
			.read_to_end(&mut bytes)
			.map_err(|err| CorpusError::MalformedInput(err.to_string()))?;
		Self::decode(&bytes, encoding)
	}

	fn save<P: AsRef<Path>>(&self, path: P, encoding: Encoding) -> Result<()> {
		let path = path.as_ref();
		let bytes = self.encode(encoding)?;
		fs::write(path, &bytes).map_err(|err| CorpusError::io(err, Some(path.to_path_buf())))?;
		debug!("wrote {} bytes ({:?}) to {}", bytes.len(), encoding, path.display());
		Ok(())
	}

	fn load<P: AsRef<Path>>(path: P, encoding: Encoding) -> Result<Self> {
		let path = path.as_ref();
		let bytes = fs::read(path).map_err(|err| CorpusError::io(err, Some(path.to_path_buf())))?;
		debug!("read {} bytes ({:?}) from {}", bytes.len(), encoding, path.display());
		Self::decode(&bytes, encoding)
	}
}
