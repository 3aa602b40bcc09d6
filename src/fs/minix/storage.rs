//! Contabilidade de espaço do Minix: bitmaps de inode e zona.
//!
//! O bit 0 de AMBOS os bitmaps é sentinela (setado no format, nunca
//! alocado); o scan de aquisição começa no índice 1. Índices de zona são
//! relativos ao bitmap — a tradução para número de zona absoluto
//! (`+ first_data_zone - 1`) é do chamador.

use crate::fs::device::{BlockDevice, BLOCK_SIZE};
use crate::fs::error::{FsError, FsResult};
use crate::fs::minix::layout::BITMAPS_START_BLOCK;
use crate::klib::bitmap::Bitmap;
use alloc::vec;

/// Dona dos dois bitmaps de um mount.
pub struct StorageManager {
    inode_bitmap: Bitmap,
    zone_bitmap: Bitmap,
    inode_bm_blocks: usize,
    zone_bm_blocks: usize,
}

impl StorageManager {
    /// Reconstrói os bitmaps a partir dos blocos reservados do disco
    /// (inode bitmap primeiro, zona em seguida).
    pub fn from_blocks(
        bm_bytes: &[u8],
        inode_bm_blocks: usize,
        zone_bm_blocks: usize,
        num_inodes: usize,
        num_zones: usize,
    ) -> Self {
        let split = inode_bm_blocks * BLOCK_SIZE;
        Self {
            // +1: o bit 0 sentinela não conta como unidade alocável
            inode_bitmap: Bitmap::from_bytes(&bm_bytes[..split], num_inodes + 1),
            zone_bitmap: Bitmap::from_bytes(&bm_bytes[split..], num_zones + 1),
            inode_bm_blocks,
            zone_bm_blocks,
        }
    }

    /// Primeiro inode livre a partir do índice 1; seta o bit.
    pub fn acquire_inode(&mut self) -> FsResult<u16> {
        match self.inode_bitmap.find_first_zero_from(1) {
            Some(i) => {
                self.inode_bitmap.set(i);
                crate::ktrace!("(MinixFS) acquire_inode -> {}", i);
                Ok(i as u16)
            }
            None => {
                crate::kwarn!("(MinixFS) bitmap de inodes esgotado");
                Err(FsError::NoSpace)
            }
        }
    }

    /// Primeiro índice de zona livre a partir de 1; seta o bit. O valor
    /// devolvido é relativo ao bitmap, não uma zona absoluta.
    pub fn acquire_zone(&mut self) -> FsResult<u16> {
        match self.zone_bitmap.find_first_zero_from(1) {
            Some(i) => {
                self.zone_bitmap.set(i);
                crate::ktrace!("(MinixFS) acquire_zone -> {}", i);
                Ok(i as u16)
            }
            None => {
                crate::kwarn!("(MinixFS) bitmap de zonas esgotado");
                Err(FsError::NoSpace)
            }
        }
    }

    /// Devolve um inode. Liberar bit já limpo é corrupção — fatal.
    pub fn free_inode(&mut self, i_num: u16) {
        assert!(
            self.inode_bitmap.test(i_num as usize),
            "free_inode: inode {} ja estava livre",
            i_num
        );
        self.inode_bitmap.clear(i_num as usize);
    }

    /// Devolve um índice de zona (relativo ao bitmap).
    pub fn free_zone(&mut self, index: u16) {
        assert!(
            self.zone_bitmap.test(index as usize),
            "free_zone: zona {} ja estava livre",
            index
        );
        self.zone_bitmap.clear(index as usize);
    }

    pub fn is_inode_set(&self, i_num: u16) -> bool {
        (i_num as usize) < self.inode_bitmap.len() && self.inode_bitmap.test(i_num as usize)
    }

    /// Escreve os dois bitmaps de volta nos blocos reservados. Última
    /// operação do storage antes do unmount.
    pub fn flush(&self, dev: &mut dyn BlockDevice) -> FsResult<()> {
        let mut buf = vec![0u8; self.inode_bm_blocks * BLOCK_SIZE];
        self.inode_bitmap.write_bytes(&mut buf);
        dev.write_blocks(BITMAPS_START_BLOCK, &buf)?;

        let mut buf = vec![0u8; self.zone_bm_blocks * BLOCK_SIZE];
        self.zone_bitmap.write_bytes(&mut buf);
        dev.write_blocks(BITMAPS_START_BLOCK + self.inode_bm_blocks as u64, &buf)?;
        crate::kdebug!("(MinixFS) bitmaps gravados");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh(num_inodes: usize, num_zones: usize) -> StorageManager {
        // Imagem de bitmaps com apenas os sentinelas (bit 0) setados.
        let mut bytes = vec![0u8; 2 * BLOCK_SIZE];
        bytes[0] = 0b0000_0001;
        bytes[BLOCK_SIZE] = 0b0000_0001;
        StorageManager::from_blocks(&bytes, 1, 1, num_inodes, num_zones)
    }

    #[test]
    fn test_first_fit_ordem() {
        // Bits {1,2,3} setados: o próximo acquire devolve 4.
        let mut sm = fresh(10, 10);
        assert_eq!(sm.acquire_inode().unwrap(), 1);
        assert_eq!(sm.acquire_inode().unwrap(), 2);
        assert_eq!(sm.acquire_inode().unwrap(), 3);
        assert_eq!(sm.acquire_inode().unwrap(), 4);
        sm.free_inode(2);
        // A lacuna mais baixa vence.
        assert_eq!(sm.acquire_inode().unwrap(), 2);
    }

    #[test]
    fn test_sentinela_nunca_alocada() {
        let mut sm = fresh(3, 3);
        for _ in 0..3 {
            assert_ne!(sm.acquire_zone().unwrap(), 0);
        }
        assert_eq!(sm.acquire_zone(), Err(FsError::NoSpace));
    }

    #[test]
    #[should_panic]
    fn test_double_free_fatal() {
        let mut sm = fresh(4, 4);
        let i = sm.acquire_inode().unwrap();
        sm.free_inode(i);
        sm.free_inode(i);
    }

    #[test]
    fn test_flush_roundtrip() {
        use crate::fs::device::RamDisk;
        let mut sm = fresh(10, 10);
        sm.acquire_inode().unwrap();
        sm.acquire_zone().unwrap();
        sm.acquire_zone().unwrap();
        let mut disk = RamDisk::zeroed(8);
        sm.flush(&mut disk).unwrap();

        let mut bytes = vec![0u8; 2 * BLOCK_SIZE];
        disk.read_blocks(BITMAPS_START_BLOCK, &mut bytes).unwrap();
        let sm2 = StorageManager::from_blocks(&bytes, 1, 1, 10, 10);
        assert!(sm2.is_inode_set(1));
        assert!(!sm2.is_inode_set(2));
    }
}
