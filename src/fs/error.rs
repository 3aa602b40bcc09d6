//! Erros do subsistema de FS.

use core::fmt;

/// Falhas recuperáveis de operações de filesystem.
///
/// Corrupção de metadados e violações de contrato interno NÃO passam por
/// aqui — são `assert!`/`panic!` (estado inconsistente não é recuperável).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    /// Inode/entrada não existe.
    NotFound,
    /// Superbloco inválido (magic errado, contadores zerados).
    InvalidSuperblock,
    /// Sem inode ou zona livre.
    NoSpace,
    /// Falha de leitura/escrita no dispositivo de bloco.
    IoError,
    /// Nome de entrada inválido (vazio ou longo demais).
    InvalidName,
    /// Entrada já existe no diretório.
    AlreadyExists,
}

impl FsError {
    pub fn as_str(&self) -> &'static str {
        match self {
            FsError::NotFound => "inode ou entrada nao encontrada",
            FsError::InvalidSuperblock => "superbloco invalido",
            FsError::NoSpace => "sem inode ou zona livre",
            FsError::IoError => "erro de I/O no dispositivo",
            FsError::InvalidName => "nome de entrada invalido",
            FsError::AlreadyExists => "entrada ja existe",
        }
    }
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type FsResult<T> = Result<T, FsError>;
