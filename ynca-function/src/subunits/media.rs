//! Media and streaming source subunits
//!
//! Sources fall into three function tables: full media players with repeat,
//! shuffle and track times, plain streaming sources, and net radio.

use crate::converter::{DurationConverter, EnumConverter, StrConverter};
use crate::enums::{Avail, Playback, PlaybackInfo, Repeat, Shuffle};
use crate::function::{Function, FunctionDescriptor, FunctionSpec, SubunitSchema};

pub static AVAIL: Function<EnumConverter<Avail>> =
    Function::new(FunctionDescriptor::get("AVAIL"), EnumConverter::new());
pub static PLAYBACK: Function<EnumConverter<Playback>> =
    Function::new(FunctionDescriptor::put("PLAYBACK"), EnumConverter::new());
pub static PLAYBACKINFO: Function<EnumConverter<PlaybackInfo>> =
    Function::new(FunctionDescriptor::get("PLAYBACKINFO"), EnumConverter::new());
pub static REPEAT: Function<EnumConverter<Repeat>> =
    Function::new(FunctionDescriptor::get_put("REPEAT"), EnumConverter::new());
pub static SHUFFLE: Function<EnumConverter<Shuffle>> =
    Function::new(FunctionDescriptor::get_put("SHUFFLE"), EnumConverter::new());

pub static ARTIST: Function<StrConverter> =
    Function::new(FunctionDescriptor::get("ARTIST").init("METAINFO"), StrConverter::new());
pub static ALBUM: Function<StrConverter> =
    Function::new(FunctionDescriptor::get("ALBUM").init("METAINFO"), StrConverter::new());
pub static SONG: Function<StrConverter> =
    Function::new(FunctionDescriptor::get("SONG").init("METAINFO"), StrConverter::new());
pub static STATION: Function<StrConverter> =
    Function::new(FunctionDescriptor::get("STATION").init("METAINFO"), StrConverter::new());

pub static ELAPSEDTIME: Function<DurationConverter> =
    Function::new(FunctionDescriptor::get("ELAPSEDTIME"), DurationConverter::new());
pub static TOTALTIME: Function<DurationConverter> =
    Function::new(FunctionDescriptor::get("TOTALTIME"), DurationConverter::new());

static MEDIA_FUNCTIONS: [&dyn FunctionSpec; 10] = [
    &AVAIL,
    &PLAYBACK,
    &PLAYBACKINFO,
    &REPEAT,
    &SHUFFLE,
    &ARTIST,
    &ALBUM,
    &SONG,
    &ELAPSEDTIME,
    &TOTALTIME,
];

static STREAM_FUNCTIONS: [&dyn FunctionSpec; 6] =
    [&AVAIL, &PLAYBACK, &PLAYBACKINFO, &ARTIST, &ALBUM, &SONG];

static NETRADIO_FUNCTIONS: [&dyn FunctionSpec; 7] = [
    &AVAIL,
    &PLAYBACK,
    &PLAYBACKINFO,
    &STATION,
    &ALBUM,
    &SONG,
    &ELAPSEDTIME,
];

pub static NETRADIO: SubunitSchema = SubunitSchema::new("NETRADIO", &NETRADIO_FUNCTIONS);

pub static USB: SubunitSchema = SubunitSchema::new("USB", &MEDIA_FUNCTIONS);
pub static SERVER: SubunitSchema = SubunitSchema::new("SERVER", &MEDIA_FUNCTIONS);
pub static PC: SubunitSchema = SubunitSchema::new("PC", &MEDIA_FUNCTIONS);
pub static IPOD: SubunitSchema = SubunitSchema::new("IPOD", &MEDIA_FUNCTIONS);
pub static IPODUSB: SubunitSchema = SubunitSchema::new("IPODUSB", &MEDIA_FUNCTIONS);
pub static NAPSTER: SubunitSchema = SubunitSchema::new("NAPSTER", &MEDIA_FUNCTIONS);
pub static RHAP: SubunitSchema = SubunitSchema::new("RHAP", &MEDIA_FUNCTIONS);
pub static DEEZER: SubunitSchema = SubunitSchema::new("DEEZER", &MEDIA_FUNCTIONS);
pub static TIDAL: SubunitSchema = SubunitSchema::new("TIDAL", &MEDIA_FUNCTIONS);

pub static AIRPLAY: SubunitSchema = SubunitSchema::new("AIRPLAY", &STREAM_FUNCTIONS);
pub static SPOTIFY: SubunitSchema = SubunitSchema::new("SPOTIFY", &STREAM_FUNCTIONS);
pub static BT: SubunitSchema = SubunitSchema::new("BT", &STREAM_FUNCTIONS);
pub static PANDORA: SubunitSchema = SubunitSchema::new("PANDORA", &STREAM_FUNCTIONS);
pub static SIRIUS: SubunitSchema = SubunitSchema::new("SIRIUS", &STREAM_FUNCTIONS);
pub static SIRIUSIR: SubunitSchema = SubunitSchema::new("SIRIUSIR", &STREAM_FUNCTIONS);
pub static SIRIUSXM: SubunitSchema = SubunitSchema::new("SIRIUSXM", &STREAM_FUNCTIONS);
pub static UAW: SubunitSchema = SubunitSchema::new("UAW", &STREAM_FUNCTIONS);
