mod codecs;
mod properties;
