use std::fmt::Debug;

use log::info;

use crate::{core::item::ItemWriter, error::WxrError};

/// Logs every item at `info` level instead of writing it anywhere.
///
/// Handy for a dry run over an export before choosing an output format.
#[derive(Default)]
pub struct LoggerWriter {}

impl<T> ItemWriter<T> for LoggerWriter
where
    T: Debug,
{
    fn write(&self, items: &[T]) -> Result<(), WxrError> {
        items.iter().for_each(|item| info!("Record:{:?}", item));
        Ok(())
    }
}
