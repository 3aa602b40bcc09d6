//! Árvore de dentries em memória.
//!
//! Nós guardados numa arena indexada por [`DentryId`]: a relação
//! pai→filhos é a única posse; filho→pai e dentry↔inode são ids, nunca
//! referências fortes. A raiz é pai de si mesma (o único ciclo
//! deliberado, por identidade).

use alloc::string::String;
use alloc::vec::Vec;

/// Handle de um nó na arena. A raiz é sempre o id 0.
pub type DentryId = usize;

pub const ROOT_DENTRY: DentryId = 0;

#[derive(Debug)]
pub struct Dentry {
    pub name: String,
    pub parent: DentryId,
    pub children: Vec<DentryId>,
    pub i_num: u16,
    /// Nó removido da árvore; o slot fica morto (sem reuso).
    dead: bool,
}

/// Arena da árvore de um mount.
pub struct DentryTree {
    nodes: Vec<Dentry>,
}

impl DentryTree {
    /// Cria a árvore com a raiz auto-apontada ligada a `root_inode`.
    pub fn new(root_inode: u16) -> Self {
        Self {
            nodes: alloc::vec![Dentry {
                name: String::from("/"),
                parent: ROOT_DENTRY,
                children: Vec::new(),
                i_num: root_inode,
                dead: false,
            }],
        }
    }

    pub fn get(&self, id: DentryId) -> &Dentry {
        let d = &self.nodes[id];
        assert!(!d.dead, "dentry {} removida", id);
        d
    }

    /// Pendura um filho novo em `parent` e devolve o id.
    pub fn alloc_child(&mut self, parent: DentryId, name: &str, i_num: u16) -> DentryId {
        assert!(!self.nodes[parent].dead);
        let id = self.nodes.len();
        self.nodes.push(Dentry {
            name: String::from(name),
            parent,
            children: Vec::new(),
            i_num,
            dead: false,
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Desliga um nó folha da árvore. Remover nó com filhos é erro de
    /// lógica.
    pub fn remove(&mut self, id: DentryId) {
        assert_ne!(id, ROOT_DENTRY, "remover a raiz");
        assert!(!self.nodes[id].dead);
        assert!(self.nodes[id].children.is_empty(), "dentry {} tem filhos", id);
        let parent = self.nodes[id].parent;
        self.nodes[parent].children.retain(|&c| c != id);
        self.nodes[id].dead = true;
    }

    pub fn lookup_child(&self, parent: DentryId, name: &str) -> Option<DentryId> {
        self.nodes[parent]
            .children
            .iter()
            .copied()
            .find(|&c| !self.nodes[c].dead && self.nodes[c].name == name)
    }
}
