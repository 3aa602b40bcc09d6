//! Bitmap genérico
//!
//! Contabilidade bit-por-unidade usada uniformemente para frames físicos,
//! inodes e zonas. O bitmap só registra ocupação; ele NÃO é dono das
//! unidades e NÃO é thread-safe por si só — o chamador segura o lock.

use alloc::vec;
use alloc::vec::Vec;

/// Bitmap para gerenciamento de bits. Bit setado = unidade em uso.
pub struct Bitmap {
    data: Vec<u64>,
    len: usize,
}

impl Bitmap {
    /// Cria bitmap com todos os bits limpos.
    pub fn new(bits: usize) -> Self {
        Self {
            data: vec![0u64; bits.div_ceil(64)],
            len: bits,
        }
    }

    /// Cria bitmap a partir de uma imagem em disco.
    ///
    /// Convenção Minix: bit `i` vive no byte `i / 8`, posição `i % 8`
    /// (LSB primeiro). O layout interno em words little-endian preserva
    /// essa ordem bit-exata no round-trip com [`Bitmap::write_bytes`].
    pub fn from_bytes(bytes: &[u8], bits: usize) -> Self {
        assert!(bytes.len() * 8 >= bits, "imagem de bitmap menor que {} bits", bits);
        let mut data = vec![0u64; bits.div_ceil(64)];
        for (i, chunk) in bytes.chunks(8).enumerate() {
            if i >= data.len() {
                break;
            }
            let mut word = [0u8; 8];
            word[..chunk.len()].copy_from_slice(chunk);
            data[i] = u64::from_le_bytes(word);
        }
        // bits além de `len` no último word não participam dos scans
        Self { data, len: bits }
    }

    /// Serializa o bitmap de volta para o formato de disco.
    pub fn write_bytes(&self, out: &mut [u8]) {
        let n = self.len.div_ceil(8);
        assert!(out.len() >= n, "buffer de saída menor que o bitmap");
        for (i, &word) in self.data.iter().enumerate() {
            let bytes = word.to_le_bytes();
            for (k, &b) in bytes.iter().enumerate() {
                let pos = i * 8 + k;
                if pos < n {
                    out[pos] = b;
                }
            }
        }
    }

    /// Número de bits do bitmap.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Define um bit.
    pub fn set(&mut self, index: usize) {
        assert!(index < self.len, "bitmap: índice {} fora do limite {}", index, self.len);
        self.data[index / 64] |= 1 << (index % 64);
    }

    /// Limpa um bit.
    pub fn clear(&mut self, index: usize) {
        assert!(index < self.len, "bitmap: índice {} fora do limite {}", index, self.len);
        self.data[index / 64] &= !(1 << (index % 64));
    }

    /// Testa um bit.
    pub fn test(&self, index: usize) -> bool {
        assert!(index < self.len, "bitmap: índice {} fora do limite {}", index, self.len);
        (self.data[index / 64] & (1 << (index % 64))) != 0
    }

    /// Testa e seta em um passo: retorna `true` se a unidade estava livre
    /// e agora foi marcada como usada. Atômico apenas sob o lock do dono.
    pub fn test_and_set(&mut self, index: usize) -> bool {
        if self.test(index) {
            return false;
        }
        self.set(index);
        true
    }

    /// Encontra o primeiro bit livre (0).
    pub fn find_first_zero(&self) -> Option<usize> {
        self.find_first_zero_from(0)
    }

    /// Encontra o primeiro bit livre a partir de `start` (inclusive).
    pub fn find_first_zero_from(&self, start: usize) -> Option<usize> {
        if start >= self.len {
            return None;
        }
        let mut word_idx = start / 64;
        // Primeiro word: mascarar os bits abaixo de `start`
        let mut word = self.data[word_idx] | ((1u64 << (start % 64)) - 1);
        loop {
            if word != u64::MAX {
                let bit = word.trailing_ones() as usize;
                let index = word_idx * 64 + bit;
                if index < self.len {
                    return Some(index);
                }
                return None;
            }
            word_idx += 1;
            if word_idx >= self.data.len() {
                return None;
            }
            word = self.data[word_idx];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_clear_roundtrip() {
        let mut bm = Bitmap::new(130);
        for i in 0..130 {
            assert!(!bm.test(i));
            bm.set(i);
            assert!(bm.test(i));
            bm.clear(i);
            assert!(!bm.test(i));
        }
    }

    #[test]
    fn test_test_and_set() {
        let mut bm = Bitmap::new(8);
        assert!(bm.test_and_set(3));
        assert!(!bm.test_and_set(3));
        assert!(bm.test(3));
    }

    #[test]
    fn test_find_first_zero() {
        let mut bm = Bitmap::new(200);
        assert_eq!(bm.find_first_zero(), Some(0));
        for i in 0..70 {
            bm.set(i);
        }
        assert_eq!(bm.find_first_zero(), Some(70));
        assert_eq!(bm.find_first_zero_from(64), Some(70));
        assert_eq!(bm.find_first_zero_from(150), Some(150));
    }

    #[test]
    fn test_find_exhausted() {
        let mut bm = Bitmap::new(65);
        for i in 0..65 {
            bm.set(i);
        }
        assert_eq!(bm.find_first_zero(), None);
    }

    #[test]
    fn test_disk_roundtrip() {
        // bit i no byte i/8, posição i%8 (LSB primeiro)
        let bytes = [0b0000_0011u8, 0b1000_0000];
        let bm = Bitmap::from_bytes(&bytes, 16);
        assert!(bm.test(0));
        assert!(bm.test(1));
        assert!(!bm.test(2));
        assert!(bm.test(15));

        let mut out = [0u8; 2];
        bm.write_bytes(&mut out);
        assert_eq!(out, bytes);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_is_fatal() {
        let bm = Bitmap::new(10);
        bm.test(10);
    }
}
