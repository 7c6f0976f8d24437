//! Traversal of host collections through the host iterator protocol
//!
//! `iterator()` is invoked once, then `hasNext()` and `next()` alternate until
//! `hasNext()` answers false. Elements are yielded in host iteration order.

use crate::error::HostResult;
use crate::invoke::HostObject;
use crate::value::ObjectRef;

const ITERATOR_SIGNATURE: &str = "()Ljava/util/Iterator;";
const HAS_NEXT_SIGNATURE: &str = "()Z";
const NEXT_SIGNATURE: &str = "()Ljava/lang/Object;";

/// Iterator over the elements of a host collection.
///
/// Stops after the first error; a null element is an error.
pub struct HostIterator<'a> {
    iterator: HostObject<'a>,
    done: bool,
}

impl<'a> HostIterator<'a> {
    /// Obtain the host iterator of `collection`
    pub fn new(collection: &HostObject<'a>) -> HostResult<Self> {
        let iterator = collection.call_object("iterator", ITERATOR_SIGNATURE, &[])?;
        Ok(Self {
            iterator,
            done: false,
        })
    }

    fn advance(&mut self) -> HostResult<Option<ObjectRef>> {
        if !self.iterator.call_bool("hasNext", HAS_NEXT_SIGNATURE, &[])? {
            return Ok(None);
        }
        self.iterator.call("next", NEXT_SIGNATURE, &[]).map(Some)
    }
}

impl Iterator for HostIterator<'_> {
    type Item = HostResult<ObjectRef>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(obj)) => Some(Ok(obj)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<'a> HostObject<'a> {
    /// Invoke a method returning a host collection and collect its elements
    pub fn call_list(&self, name: &str, signature: &str) -> HostResult<Vec<HostObject<'a>>> {
        let collection = self.call_object(name, signature, &[])?;
        let ctx = self.context();
        HostIterator::new(&collection)?
            .map(|element| element.map(|obj| HostObject::new(ctx, obj)))
            .collect()
    }
}
