mod files;
mod store;

pub use files::{
    AssetValue, ClassFile, ClassRecord, ItemFile, ItemKind, ItemRecord, ItemSubtype, MapFile,
    MapTile, NpcFile, NpcRecord, SpellFile, SpellRecord, TileSpec, WarpTile,
};
pub use store::{AssetKey, AssetStore, MemoryAssetStore};
