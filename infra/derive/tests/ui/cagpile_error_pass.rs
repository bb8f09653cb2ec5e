use cagpile_derive::cagpile_error;
use std::borrow::Cow;

#[cagpile_error]
pub enum LayerFileError {
    #[error("Layer file unreadable{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Layer missing{}: {message}", format_context(.context))]
    Missing { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read_layer() -> Result<Vec<u8>, LayerFileError> {
    std::fs::read("Cagpile_Road.geojson").context("Reading roads")
}

fn main() {
    let _ = read_layer();
    let _: LayerFileError = "fallback".into();
}
