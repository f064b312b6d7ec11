//! Emits the configuration reference of the sample stack as JSON IR.

use flagdoc_gen::GenError;
use sample_stack::{Config, root_blocks};

fn main() -> Result<(), GenError> {
    flagdoc_gen::run::<Config>(&root_blocks())
}
