#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]

pub mod model {
    pub use quadstore_model::*;
}

pub mod encoding {
    pub use quadstore_encoding::*;
}

pub mod storage {
    pub use quadstore_storage::*;
}
