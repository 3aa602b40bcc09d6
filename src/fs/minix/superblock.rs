//! Superbloco Minix: ciclo de vida de inodes e orquestração do disco.
//!
//! Caminho único de instanciação: `inode()` consulta o cache antes do
//! disco, então nunca existem dois objetos em memória para o mesmo inode
//! on-disk (duas cópias fariam um flush atropelar o outro). Erros
//! recuperáveis (sem espaço, I/O) sobem como [`FsError`]; corrupção de
//! metadados e violação de contrato derrubam com `assert!`.

use crate::fs::device::{BlockDevice, BLOCK_SIZE};
use crate::fs::error::{FsError, FsResult};
use crate::fs::minix::dentry::{DentryId, DentryTree, ROOT_DENTRY};
use crate::fs::minix::inode::{Inode, InodeType};
use crate::fs::minix::layout::{
    RawDirent, RawInode, RawSuperblock, BITMAPS_START_BLOCK, DIRECT_ZONES, DIRENT_SIZE,
    INODES_PER_BLOCK, INODE_SIZE, MAX_NAME_LEN, MINIX_MAGIC, ROOT_INODE, SUPERBLOCK_BLOCK,
    ZONES_PER_INDIRECT,
};
use crate::fs::minix::storage::StorageManager;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;

pub struct MinixSuperblock {
    dev: Box<dyn BlockDevice>,
    raw: RawSuperblock,
    storage: StorageManager,
    /// Cache: no máximo uma instância por inode on-disk.
    inodes: BTreeMap<u16, Inode>,
    dentries: DentryTree,
}

impl MinixSuperblock {
    // ------------------------------------------------------------------
    // Mount / format
    // ------------------------------------------------------------------

    /// Monta um FS existente: valida o superbloco, reconstrói os
    /// bitmaps, carrega o inode raiz e os filhos da raiz.
    pub fn mount(dev: Box<dyn BlockDevice>) -> FsResult<Self> {
        let mut block = [0u8; BLOCK_SIZE];
        dev.read_blocks(SUPERBLOCK_BLOCK, &mut block)?;
        let raw = RawSuperblock::parse(&block)?;
        crate::kinfo!(
            "(MinixFS) mount: {} inodes, {} zonas, 1a zona de dados {}",
            raw.num_inodes,
            raw.num_zones,
            raw.first_data_zone
        );

        let bm_blocks = (raw.inode_bm_blocks + raw.zone_bm_blocks) as usize;
        let mut bm_bytes = vec![0u8; bm_blocks * BLOCK_SIZE];
        dev.read_blocks(BITMAPS_START_BLOCK, &mut bm_bytes)?;
        let storage = StorageManager::from_blocks(
            &bm_bytes,
            raw.inode_bm_blocks as usize,
            raw.zone_bm_blocks as usize,
            raw.num_inodes as usize,
            raw.num_zones as usize,
        );

        let mut sb = Self {
            dev,
            raw,
            storage,
            inodes: BTreeMap::new(),
            dentries: DentryTree::new(ROOT_INODE),
        };
        let root = sb.inode(ROOT_INODE)?.ok_or(FsError::InvalidSuperblock)?;
        assert!(root.i_type == InodeType::Dir, "raiz nao e diretorio");
        if let Some(inode) = sb.inodes.get_mut(&ROOT_INODE) {
            inode.dentry = Some(ROOT_DENTRY);
        }
        sb.load_children(ROOT_DENTRY)?;
        Ok(sb)
    }

    /// Grava um FS vazio na imagem: superbloco, bitmaps com sentinelas,
    /// tabela de inodes zerada e diretório raiz.
    pub fn format(dev: &mut dyn BlockDevice, num_inodes: u16, num_zones: u16) -> FsResult<()> {
        let bm_blocks_for = |units: usize| (units + 1).div_ceil(8 * BLOCK_SIZE) as u16;
        let inode_bm_blocks = bm_blocks_for(num_inodes as usize);
        let zone_bm_blocks = bm_blocks_for(num_zones as usize);
        let itable_blocks = (num_inodes as usize).div_ceil(INODES_PER_BLOCK) as u16;
        let first_data_zone = 2 + inode_bm_blocks + zone_bm_blocks + itable_blocks;

        let raw = RawSuperblock {
            num_inodes,
            num_zones,
            inode_bm_blocks,
            zone_bm_blocks,
            first_data_zone,
            log_zone_size: 0,
            max_file_size: (DIRECT_ZONES * BLOCK_SIZE) as u32,
            magic: MINIX_MAGIC,
        };
        let mut block = [0u8; BLOCK_SIZE];
        raw.encode(&mut block);
        dev.write_blocks(SUPERBLOCK_BLOCK, &block)?;

        // Bitmaps: sentinela no bit 0 de ambos; inode 1 (raiz) e a
        // primeira zona de dados já em uso.
        let mut bm = vec![0u8; inode_bm_blocks as usize * BLOCK_SIZE];
        bm[0] = 0b0000_0011;
        dev.write_blocks(BITMAPS_START_BLOCK, &bm)?;
        let mut bm = vec![0u8; zone_bm_blocks as usize * BLOCK_SIZE];
        bm[0] = 0b0000_0011;
        dev.write_blocks(BITMAPS_START_BLOCK + inode_bm_blocks as u64, &bm)?;

        // Tabela de inodes zerada, só o registro da raiz preenchido.
        let itable_start = raw.inode_table_block();
        let zeroed = [0u8; BLOCK_SIZE];
        for b in 0..itable_blocks as u64 {
            dev.write_blocks(itable_start + b, &zeroed)?;
        }
        let root = RawInode {
            mode: InodeType::Dir.mode_bits(),
            size: (2 * DIRENT_SIZE) as u32,
            nlink: 2,
            zones: [first_data_zone, 0, 0, 0, 0, 0, 0, 0, 0],
        };
        let mut rec = [0u8; INODE_SIZE];
        root.overlay(&mut rec);
        let (blk, off) = raw.inode_location(ROOT_INODE);
        let mut buf = [0u8; BLOCK_SIZE];
        dev.read_blocks(blk, &mut buf)?;
        buf[off..off + INODE_SIZE].copy_from_slice(&rec);
        dev.write_blocks(blk, &buf)?;

        // Zona da raiz: "." e ".." apontando para o próprio inode 1.
        let mut dir = [0u8; BLOCK_SIZE];
        RawDirent::encode(&mut dir[..DIRENT_SIZE], ROOT_INODE, b".");
        RawDirent::encode(&mut dir[DIRENT_SIZE..2 * DIRENT_SIZE], ROOT_INODE, b"..");
        dev.write_blocks(first_data_zone as u64, &dir)?;
        crate::kinfo!(
            "(MinixFS) format: {} inodes, {} zonas, dados a partir de {}",
            num_inodes,
            num_zones,
            first_data_zone
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // I/O de bloco
    // ------------------------------------------------------------------

    /// Lê `buf.len()` bytes dentro de um único bloco.
    fn read_bytes(&mut self, block: u64, offset: usize, buf: &mut [u8]) -> FsResult<()> {
        assert!(offset + buf.len() <= BLOCK_SIZE);
        let mut tmp = [0u8; BLOCK_SIZE];
        self.dev.read_blocks(block, &mut tmp)?;
        buf.copy_from_slice(&tmp[offset..offset + buf.len()]);
        Ok(())
    }

    /// Read-modify-write de `buf.len()` bytes dentro de um único bloco,
    /// preservando os vizinhos do mesmo bloco.
    fn write_bytes(&mut self, block: u64, offset: usize, buf: &[u8]) -> FsResult<()> {
        assert!(offset + buf.len() <= BLOCK_SIZE);
        let mut tmp = [0u8; BLOCK_SIZE];
        self.dev.read_blocks(block, &mut tmp)?;
        tmp[offset..offset + buf.len()].copy_from_slice(buf);
        self.dev.write_blocks(block, &tmp)
    }

    // ------------------------------------------------------------------
    // Zonas
    // ------------------------------------------------------------------

    /// Aloca uma zona e devolve o número absoluto. O -1 existe porque o
    /// índice 0 do bitmap é sentinela e nunca sai do acquire.
    pub fn alloc_zone(&mut self) -> FsResult<u16> {
        let index = self.storage.acquire_zone()?;
        Ok(index + self.raw.first_data_zone - 1)
    }

    /// Libera uma zona pelo número absoluto.
    pub fn free_zone(&mut self, zone: u16) {
        self.storage.free_zone(zone - self.raw.first_data_zone + 1);
    }

    // ------------------------------------------------------------------
    // Ciclo de vida de inode
    // ------------------------------------------------------------------

    /// Caminho único de obtenção de inode: cache primeiro, disco depois.
    /// `None` para inode fora do alcance ou não setado no bitmap — com a
    /// exceção da raiz, cuja ausência é corrupção (fatal).
    pub fn inode(&mut self, i_num: u16) -> FsResult<Option<Inode>> {
        if i_num == 0 || i_num > self.raw.num_inodes {
            return Ok(None);
        }
        if let Some(inode) = self.inodes.get(&i_num) {
            return Ok(Some(inode.clone()));
        }
        if !self.storage.is_inode_set(i_num) {
            assert!(i_num != ROOT_INODE, "inode raiz ausente do bitmap");
            return Ok(None);
        }
        let (block, offset) = self.raw.inode_location(i_num);
        let mut rec = [0u8; INODE_SIZE];
        self.read_bytes(block, offset, &mut rec)?;
        let inode = Inode::from_raw(i_num, &RawInode::parse(&rec));
        crate::ktrace!("(MinixFS) inode {} lido do bloco {}", i_num, block);
        self.inodes.insert(i_num, inode.clone());
        Ok(Some(inode))
    }

    /// Cria um inode novo pendurado em `parent` com `name`.
    ///
    /// Esgotamento de inode/zona antes de qualquer mutação é
    /// recuperável; depois que o número foi adquirido, falha na fiação
    /// do diretório é corrupção em andamento e derruba.
    pub fn create_inode(
        &mut self,
        parent: DentryId,
        name: &str,
        i_type: InodeType,
    ) -> FsResult<u16> {
        if name.is_empty() || name.len() > MAX_NAME_LEN || name.contains('/') {
            return Err(FsError::InvalidName);
        }
        if self.dentries.lookup_child(parent, name).is_some() {
            return Err(FsError::AlreadyExists);
        }
        {
            let parent_inode = self
                .inodes
                .get(&self.dentries.get(parent).i_num)
                .ok_or(FsError::NotFound)?;
            assert!(parent_inode.i_type == InodeType::Dir);
        }

        let i_num = self.storage.acquire_inode()?;
        let mut inode = Inode::fresh(i_num, i_type);
        match i_type {
            InodeType::File => inode.i_nlink = 1,
            InodeType::Dir => inode.i_nlink = 2,
            InodeType::Link => inode.i_nlink = 1,
        }
        self.inodes.insert(i_num, inode);
        self.write_inode(i_num)?;

        // Daqui em diante, falha é assert (fiação de diretório não tem
        // caminho de desfazer neste layer).
        if i_type == InodeType::Dir {
            let r = self.mkdir(parent, name, i_num);
            assert!(r.is_ok(), "mkdir falhou: {:?}", r.err());
        } else {
            let r = self.mkfile(parent, name, i_num);
            assert!(r.is_ok(), "mkfile falhou: {:?}", r.err());
        }
        crate::kdebug!("(MinixFS) criado inode {} ({:?}) '{}'", i_num, i_type, name);
        Ok(i_num)
    }

    /// Fia um arquivo novo na árvore e no diretório pai.
    fn mkfile(&mut self, parent: DentryId, name: &str, i_num: u16) -> FsResult<()> {
        let id = self.dentries.alloc_child(parent, name, i_num);
        if let Some(inode) = self.inodes.get_mut(&i_num) {
            inode.dentry = Some(id);
        }
        self.append_dirent(parent, i_num, name)
    }

    /// mkfile + zona própria com "." e "..".
    fn mkdir(&mut self, parent: DentryId, name: &str, i_num: u16) -> FsResult<()> {
        self.mkfile(parent, name, i_num)?;
        let zone = self.alloc_zone()?;
        let mut dir = [0u8; BLOCK_SIZE];
        RawDirent::encode(&mut dir[..DIRENT_SIZE], i_num, b".");
        let parent_i_num = self.dentries.get(parent).i_num;
        RawDirent::encode(&mut dir[DIRENT_SIZE..2 * DIRENT_SIZE], parent_i_num, b"..");
        self.dev.write_blocks(zone as u64, &dir)?;
        if let Some(inode) = self.inodes.get_mut(&i_num) {
            inode.i_zones[0] = zone;
            inode.i_size = (2 * DIRENT_SIZE) as u32;
        }
        self.write_inode(i_num)
    }

    /// Acrescenta uma entrada no diretório `parent` (zonas diretas).
    fn append_dirent(&mut self, parent: DentryId, i_num: u16, name: &str) -> FsResult<()> {
        let parent_i_num = self.dentries.get(parent).i_num;
        let (slot, zones, size) = {
            let p = self.inodes.get(&parent_i_num).ok_or(FsError::NotFound)?;
            (p.i_size as usize / DIRENT_SIZE, p.i_zones, p.i_size)
        };
        let zone_idx = slot * DIRENT_SIZE / BLOCK_SIZE;
        if zone_idx >= DIRECT_ZONES {
            return Err(FsError::NoSpace);
        }
        let zone = if zones[zone_idx] != 0 {
            zones[zone_idx]
        } else {
            let z = self.alloc_zone()?;
            self.dev.write_blocks(z as u64, &[0u8; BLOCK_SIZE])?;
            if let Some(p) = self.inodes.get_mut(&parent_i_num) {
                p.i_zones[zone_idx] = z;
            }
            z
        };
        let mut rec = [0u8; DIRENT_SIZE];
        RawDirent::encode(&mut rec, i_num, name.as_bytes());
        self.write_bytes(zone as u64, slot * DIRENT_SIZE % BLOCK_SIZE, &rec)?;
        if let Some(p) = self.inodes.get_mut(&parent_i_num) {
            p.i_size = size + DIRENT_SIZE as u32;
        }
        self.write_inode(parent_i_num)
    }

    /// Reconstrói as dentries filhas de `dir` a partir do disco. Os
    /// inodes dos filhos continuam preguiçosos (carregados no primeiro
    /// `inode()`).
    fn load_children(&mut self, dir: DentryId) -> FsResult<()> {
        let dir_i_num = self.dentries.get(dir).i_num;
        let (zones, size) = {
            let inode = self.inode(dir_i_num)?.ok_or(FsError::NotFound)?;
            (inode.i_zones, inode.i_size as usize)
        };
        let mut read = 0usize;
        let mut block = [0u8; BLOCK_SIZE];
        for zone in zones.iter().take(DIRECT_ZONES) {
            if *zone == 0 || read >= size {
                break;
            }
            self.dev.read_blocks(*zone as u64, &mut block)?;
            let mut off = 0;
            while off + DIRENT_SIZE <= BLOCK_SIZE && read < size {
                let (i_num, name) = RawDirent::parse(&block[off..off + DIRENT_SIZE]);
                off += DIRENT_SIZE;
                read += DIRENT_SIZE;
                if i_num == 0 || name == b"." || name == b".." {
                    continue;
                }
                let name = core::str::from_utf8(name).map_err(|_| FsError::InvalidName)?;
                let id = self.dentries.alloc_child(dir, name, i_num);
                if let Some(child) = self.inode(i_num)? {
                    if child.i_type == InodeType::Dir {
                        self.load_children(id)?;
                    }
                    if let Some(inode) = self.inodes.get_mut(&i_num) {
                        inode.dentry = Some(id);
                    }
                }
            }
        }
        Ok(())
    }

    /// Grava o registro do inode: relê o bloco para não atropelar os
    /// registros vizinhos, sobrepõe os campos e escreve de volta.
    pub fn write_inode(&mut self, i_num: u16) -> FsResult<()> {
        let raw = self
            .inodes
            .get(&i_num)
            .ok_or(FsError::NotFound)?
            .to_raw();
        let (block, offset) = self.raw.inode_location(i_num);
        let mut rec = [0u8; INODE_SIZE];
        self.read_bytes(block, offset, &mut rec)?;
        raw.overlay(&mut rec);
        self.write_bytes(block, offset, &rec)?;
        if let Some(inode) = self.inodes.get_mut(&i_num) {
            inode.dirty = false;
        }
        Ok(())
    }

    /// Destrói um inode: zonas de volta ao bitmap (diretas, indiretas e
    /// dupla-indiretas), bit de inode limpo, registro on-disk zerado,
    /// instância removida do cache. Exige zero descritores abertos e
    /// nenhuma posição na árvore.
    pub fn delete_inode(&mut self, i_num: u16) -> FsResult<()> {
        let inode = self.inodes.get(&i_num).ok_or(FsError::NotFound)?.clone();
        assert_eq!(inode.open_count, 0, "delete com descritores abertos");
        assert!(inode.dentry.is_none(), "delete com dentry na arvore");

        for zone in inode.i_zones.iter().take(DIRECT_ZONES) {
            if *zone != 0 {
                self.free_zone(*zone);
            }
        }
        if inode.i_zones[DIRECT_ZONES] != 0 {
            self.free_indirect(inode.i_zones[DIRECT_ZONES], false)?;
        }
        if inode.i_zones[DIRECT_ZONES + 1] != 0 {
            self.free_indirect(inode.i_zones[DIRECT_ZONES + 1], true)?;
        }

        self.storage.free_inode(i_num);
        let (block, offset) = self.raw.inode_location(i_num);
        self.write_bytes(block, offset, &[0u8; INODE_SIZE])?;
        self.inodes.remove(&i_num);
        crate::kdebug!("(MinixFS) inode {} destruido", i_num);
        Ok(())
    }

    /// Libera as zonas apontadas por um bloco (duplo-)indireto e o
    /// próprio bloco.
    fn free_indirect(&mut self, zone: u16, double: bool) -> FsResult<()> {
        let mut block = [0u8; BLOCK_SIZE];
        self.dev.read_blocks(zone as u64, &mut block)?;
        for n in 0..ZONES_PER_INDIRECT {
            let entry = u16::from_le_bytes([block[n * 2], block[n * 2 + 1]]);
            if entry == 0 {
                continue;
            }
            if double {
                self.free_indirect(entry, false)?;
            } else {
                self.free_zone(entry);
            }
        }
        self.free_zone(zone);
        Ok(())
    }

    /// Remove a entrada de `name` da árvore e do diretório pai no disco
    /// (a entrada vira inode 0). O inode do filho fica órfão, pronto
    /// para `delete_inode`.
    pub fn unlink(&mut self, parent: DentryId, name: &str) -> FsResult<u16> {
        let id = self
            .dentries
            .lookup_child(parent, name)
            .ok_or(FsError::NotFound)?;
        let i_num = self.dentries.get(id).i_num;
        self.dentries.remove(id);
        if let Some(inode) = self.inodes.get_mut(&i_num) {
            inode.dentry = None;
            inode.i_nlink = inode.i_nlink.saturating_sub(1);
        }

        // Zera a entrada correspondente nas zonas do pai.
        let parent_i_num = self.dentries.get(parent).i_num;
        let (zones, size) = {
            let p = self.inodes.get(&parent_i_num).ok_or(FsError::NotFound)?;
            (p.i_zones, p.i_size as usize)
        };
        let mut scanned = 0usize;
        let mut block = [0u8; BLOCK_SIZE];
        for zone in zones.iter().take(DIRECT_ZONES) {
            if *zone == 0 || scanned >= size {
                break;
            }
            self.dev.read_blocks(*zone as u64, &mut block)?;
            let mut off = 0;
            while off + DIRENT_SIZE <= BLOCK_SIZE && scanned < size {
                let (entry_num, entry_name) = RawDirent::parse(&block[off..off + DIRENT_SIZE]);
                if entry_num == i_num && entry_name == name.as_bytes() {
                    self.write_bytes(*zone as u64, off, &[0u8; DIRENT_SIZE])?;
                    return Ok(i_num);
                }
                off += DIRENT_SIZE;
                scanned += DIRENT_SIZE;
            }
        }
        // Árvore e disco divergem: corrupção.
        panic!("unlink: entrada '{}' ausente do diretorio on-disk", name);
    }

    // ------------------------------------------------------------------
    // Descritores
    // ------------------------------------------------------------------

    /// Abre um descritor sobre o inode (contabilidade apenas).
    pub fn create_fd(&mut self, i_num: u16) -> FsResult<u32> {
        let inode = self.inodes.get_mut(&i_num).ok_or(FsError::NotFound)?;
        inode.open_count += 1;
        Ok(inode.open_count)
    }

    /// Fecha um descritor. Fechar sem abrir é erro de lógica.
    pub fn remove_fd(&mut self, i_num: u16) -> FsResult<u32> {
        let inode = self.inodes.get_mut(&i_num).ok_or(FsError::NotFound)?;
        assert!(inode.open_count > 0, "remove_fd sem descritor aberto");
        inode.open_count -= 1;
        Ok(inode.open_count)
    }

    // ------------------------------------------------------------------
    // Dados de arquivo (zonas diretas)
    // ------------------------------------------------------------------

    /// Escreve `data` a partir de `pos`, alocando zonas diretas sob
    /// demanda. Além das 7 zonas diretas: NoSpace.
    pub fn write_data(&mut self, i_num: u16, pos: u32, data: &[u8]) -> FsResult<()> {
        let mut pos = pos as usize;
        let mut data = data;
        while !data.is_empty() {
            let zone_idx = pos / BLOCK_SIZE;
            if zone_idx >= DIRECT_ZONES {
                return Err(FsError::NoSpace);
            }
            let zone = {
                let inode = self.inodes.get(&i_num).ok_or(FsError::NotFound)?;
                inode.i_zones[zone_idx]
            };
            let zone = if zone != 0 {
                zone
            } else {
                let z = self.alloc_zone()?;
                self.dev.write_blocks(z as u64, &[0u8; BLOCK_SIZE])?;
                if let Some(inode) = self.inodes.get_mut(&i_num) {
                    inode.i_zones[zone_idx] = z;
                }
                z
            };
            let off = pos % BLOCK_SIZE;
            let n = core::cmp::min(BLOCK_SIZE - off, data.len());
            self.write_bytes(zone as u64, off, &data[..n])?;
            pos += n;
            data = &data[n..];
        }
        if let Some(inode) = self.inodes.get_mut(&i_num) {
            if pos as u32 > inode.i_size {
                inode.i_size = pos as u32;
            }
            inode.dirty = true;
        }
        Ok(())
    }

    /// Lê até `buf.len()` bytes a partir de `pos`; devolve quantos leu.
    pub fn read_data(&mut self, i_num: u16, pos: u32, buf: &mut [u8]) -> FsResult<usize> {
        let (zones, size) = {
            let inode = self.inodes.get(&i_num).ok_or(FsError::NotFound)?;
            (inode.i_zones, inode.i_size as usize)
        };
        let mut pos = pos as usize;
        let mut done = 0usize;
        while done < buf.len() && pos < size {
            let zone_idx = pos / BLOCK_SIZE;
            if zone_idx >= DIRECT_ZONES || zones[zone_idx] == 0 {
                break;
            }
            let off = pos % BLOCK_SIZE;
            let n = core::cmp::min(core::cmp::min(BLOCK_SIZE - off, buf.len() - done), size - pos);
            let (head, _) = buf[done..].split_at_mut(n);
            self.read_bytes(zones[zone_idx] as u64, off, head)?;
            pos += n;
            done += n;
        }
        Ok(done)
    }

    // ------------------------------------------------------------------
    // Unmount
    // ------------------------------------------------------------------

    /// Desmonta: fecha descritores perdidos, grava todos os inodes do
    /// cache e os bitmaps, devolve o device. Inode sujo no unmount é
    /// erro de lógica fatal — descritor esquecido não é.
    pub fn unmount(mut self) -> FsResult<Box<dyn BlockDevice>> {
        for inode in self.inodes.values_mut() {
            assert!(!inode.dirty, "unmount com inode {} sujo", inode.i_num);
            if inode.open_count > 0 {
                crate::kwarn!(
                    "(MinixFS) unmount fechando {} descritor(es) do inode {}",
                    inode.open_count,
                    inode.i_num
                );
                inode.open_count = 0;
            }
        }
        let nums: Vec<u16> = self.inodes.keys().copied().collect();
        for i_num in nums {
            self.write_inode(i_num)?;
        }
        self.storage.flush(self.dev.as_mut())?;
        crate::kinfo!("(MinixFS) unmount limpo");
        Ok(self.dev)
    }

    // ------------------------------------------------------------------
    // Consultas
    // ------------------------------------------------------------------

    pub fn root(&self) -> DentryId {
        ROOT_DENTRY
    }

    pub fn lookup(&self, parent: DentryId, name: &str) -> Option<u16> {
        self.dentries
            .lookup_child(parent, name)
            .map(|id| self.dentries.get(id).i_num)
    }

    pub fn lookup_dentry(&self, parent: DentryId, name: &str) -> Option<DentryId> {
        self.dentries.lookup_child(parent, name)
    }
}
