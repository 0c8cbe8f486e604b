//! Extension traits

mod calendar_date;
mod depot;
mod result;

pub(crate) use calendar_date::CalendarDateExt as _;
pub(crate) use depot::DepotExt as _;
pub(crate) use result::ResultExt as _;
