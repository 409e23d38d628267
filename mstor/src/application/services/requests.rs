//! Request and response shapes for every operation the path walker can
//! dispatch to, plus the standalone `chunkalloc` request (the one
//! operation addressed by nid rather than by path).

use mstor_domain::value_objects::ids::{Cid, Nid};

#[derive(Debug, Clone)]
pub struct PathRequest {
    pub user_name: String,
    pub full_path: String,
}

#[derive(Debug, Clone)]
pub struct CreatRequest {
    pub base: PathRequest,
    pub mode: u16,
    pub ctime: u64,
}

#[derive(Debug, Clone)]
pub struct MkdirsRequest {
    pub base: PathRequest,
    pub mode: u16,
    pub ctime: u64,
}

#[derive(Debug, Clone)]
pub struct OpenRequest {
    pub base: PathRequest,
    pub atime: u64,
}

#[derive(Debug, Clone)]
pub struct ChunkFindRequest {
    pub base: PathRequest,
    pub start: u64,
    pub end: u64,
    pub max_chunks: usize,
}

#[derive(Debug, Clone)]
pub struct ChunkAllocRequest {
    pub user_name: String,
    pub nid: Nid,
    pub off: u64,
}

#[derive(Debug, Clone)]
pub struct ListdirRequest {
    pub base: PathRequest,
}

#[derive(Debug, Clone)]
pub struct StatRequest {
    pub base: PathRequest,
}

#[derive(Debug, Clone)]
pub struct ChmodRequest {
    pub base: PathRequest,
    pub mode: u16,
}

#[derive(Debug, Clone)]
pub struct ChownRequest {
    pub base: PathRequest,
    pub new_user: Option<String>,
    pub new_group: Option<String>,
}

pub const INVAL_TIME: u64 = u64::MAX;

#[derive(Debug, Clone)]
pub struct UtimesRequest {
    pub base: PathRequest,
    pub atime: u64,
    pub mtime: u64,
}

#[derive(Debug, Clone)]
pub struct RmdirRequest {
    pub base: PathRequest,
    pub recursive: bool,
}

#[derive(Debug, Clone)]
pub struct ChunkInfo {
    pub cid: Cid,
    pub start: u64,
}

#[derive(Debug, Clone)]
pub struct ChunkAllocResult {
    pub cid: Cid,
    pub oids: Vec<u32>,
}
