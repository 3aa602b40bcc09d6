//! Execução de binários: formato ELF32 e carregador por page fault.

pub mod elf;
pub mod loader;

use core::fmt;

pub use loader::{AddressSpace, ImageSource, Loader};

/// Falhas de carga. Todas locais ao processo dono do binário — matam o
/// processo com diagnóstico, nunca o kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadError {
    /// Magic/classe/endianness/máquina rejeitados na validação.
    InvalidFormat,
    /// A imagem termina antes dos bytes que o cabeçalho promete.
    TruncatedImage,
    /// Um byte virtual presente em dois segmentos ao mesmo tempo.
    OverlappingSegments,
    /// Endereço fora de todo segmento do binário.
    InvalidAccess(u32),
    /// Falha de leitura da fonte da imagem.
    Io,
}

impl LoadError {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadError::InvalidFormat => "formato de binario invalido",
            LoadError::TruncatedImage => "imagem truncada",
            LoadError::OverlappingSegments => "segmentos sobrepostos",
            LoadError::InvalidAccess(_) => "acesso fora dos segmentos",
            LoadError::Io => "erro de leitura da imagem",
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::InvalidAccess(vaddr) => {
                write!(f, "{} ({:#x})", self.as_str(), vaddr)
            }
            _ => f.write_str(self.as_str()),
        }
    }
}
