//! Dispositivos de bloco.
//!
//! O FS enxerga o armazenamento como uma sequência de blocos de
//! [`BLOCK_SIZE`] bytes endereçados a partir de zero. A tradução para o
//! meio físico (disco, imagem em RAM) fica atrás do trait
//! [`BlockDevice`].

use crate::fs::error::{FsError, FsResult};
use alloc::vec;
use alloc::vec::Vec;

/// Tamanho de bloco do FS, em bytes.
pub const BLOCK_SIZE: usize = 1024;

/// Acesso a blocos de dados.
pub trait BlockDevice: Send {
    /// Lê `buf.len() / BLOCK_SIZE` blocos a partir de `block`.
    /// `buf.len()` deve ser múltiplo de BLOCK_SIZE.
    fn read_blocks(&self, block: u64, buf: &mut [u8]) -> FsResult<()>;

    /// Escreve `buf.len() / BLOCK_SIZE` blocos a partir de `block`.
    fn write_blocks(&mut self, block: u64, buf: &[u8]) -> FsResult<()>;

    /// Número de blocos endereçáveis.
    fn block_count(&self) -> u64;
}

/// Imagem de disco em memória, com offset de base em bytes.
///
/// O offset acomoda imagens com tabela de partição: o bloco 0 do FS é o
/// byte `offset` da imagem.
pub struct RamDisk {
    data: Vec<u8>,
    offset: usize,
}

impl RamDisk {
    pub fn new(data: Vec<u8>, offset: usize) -> Self {
        Self { data, offset }
    }

    /// Imagem zerada de `blocks` blocos, sem offset.
    pub fn zeroed(blocks: usize) -> Self {
        Self {
            data: vec![0u8; blocks * BLOCK_SIZE],
            offset: 0,
        }
    }

    /// Bytes crus da imagem (inclui o prefixo antes do offset).
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    fn span(&self, block: u64, len: usize) -> FsResult<usize> {
        if len % BLOCK_SIZE != 0 {
            return Err(FsError::IoError);
        }
        let start = self
            .offset
            .checked_add((block as usize).checked_mul(BLOCK_SIZE).ok_or(FsError::IoError)?)
            .ok_or(FsError::IoError)?;
        let end = start.checked_add(len).ok_or(FsError::IoError)?;
        if end > self.data.len() {
            return Err(FsError::IoError);
        }
        Ok(start)
    }
}

impl BlockDevice for RamDisk {
    fn read_blocks(&self, block: u64, buf: &mut [u8]) -> FsResult<()> {
        let start = self.span(block, buf.len())?;
        buf.copy_from_slice(&self.data[start..start + buf.len()]);
        Ok(())
    }

    fn write_blocks(&mut self, block: u64, buf: &[u8]) -> FsResult<()> {
        let start = self.span(block, buf.len())?;
        self.data[start..start + buf.len()].copy_from_slice(buf);
        Ok(())
    }

    fn block_count(&self) -> u64 {
        ((self.data.len() - self.offset) / BLOCK_SIZE) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramdisk_roundtrip() {
        let mut disk = RamDisk::zeroed(4);
        let mut block = [0u8; BLOCK_SIZE];
        block[0] = 0xAA;
        block[BLOCK_SIZE - 1] = 0x55;
        disk.write_blocks(2, &block).unwrap();
        let mut back = [0u8; BLOCK_SIZE];
        disk.read_blocks(2, &mut back).unwrap();
        assert_eq!(back[0], 0xAA);
        assert_eq!(back[BLOCK_SIZE - 1], 0x55);
    }

    #[test]
    fn test_ramdisk_offset() {
        // Bloco 0 do FS começa no byte 512 da imagem.
        let mut raw = vec![0u8; 512 + 2 * BLOCK_SIZE];
        raw[512] = 0x7F;
        let disk = RamDisk::new(raw, 512);
        assert_eq!(disk.block_count(), 2);
        let mut buf = [0u8; BLOCK_SIZE];
        disk.read_blocks(0, &mut buf).unwrap();
        assert_eq!(buf[0], 0x7F);
    }

    #[test]
    fn test_ramdisk_fora_do_alcance() {
        let disk = RamDisk::zeroed(2);
        let mut buf = [0u8; BLOCK_SIZE];
        assert_eq!(disk.read_blocks(2, &mut buf), Err(FsError::IoError));
    }
}
