pub mod esp;
pub mod macsec;
