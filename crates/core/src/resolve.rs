//! Selector resolution: every selector string of a request is parsed
//! into one shared tree, then the result is checked against the optional
//! allow-list.

use crate::collector::{Collector, ParseSession};
use crate::error::FieldError;
use crate::info::FieldInfo;
use crate::options::FieldOptions;
use crate::parser::Parser;

/// Parse `selectors` into a deduplicated [`FieldInfo`] tree.
///
/// All selectors share one tree and one field budget, so a field
/// requested twice across two strings is still a duplicate. The first
/// error aborts the whole resolution with no partial result.
///
/// With a non-empty allow-list in `options`, every resolved node must
/// exist in the allow tree at the same path. Requesting a bare parent
/// whose allow entry lists children is fine; requesting children under
/// an allowed leaf is not.
pub fn resolve<S: AsRef<str>>(
    selectors: &[S],
    options: FieldOptions,
) -> Result<Vec<FieldInfo>, FieldError> {
    let coll = collect(selectors, &options)?;
    let infos = coll.to_field_infos();
    if !options.limited_to.is_empty() {
        let allowed = collect(&options.limited_to, &options)?;
        allowed.ensure_allows(&infos)?;
    }
    Ok(infos)
}

fn collect<S: AsRef<str>>(
    selectors: &[S],
    options: &FieldOptions,
) -> Result<Collector, FieldError> {
    let mut coll = Collector::new();
    let mut session = ParseSession::new(options);
    for selector in selectors {
        Parser::new(selector.as_ref()).parse(&mut coll, &mut session)?;
    }
    Ok(coll)
}
