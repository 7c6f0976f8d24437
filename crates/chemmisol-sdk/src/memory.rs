//! In-memory host runtime
//!
//! A small managed runtime implementing [`HostContext`] without a JVM:
//! classes with methods resolved by name and signature, objects with named
//! fields, enum classes with static constants, strings, array lists and their
//! iterators, a pending-exception slot and a log of every invoked method.
//!
//! It is single-threaded, like the host environment pointer it stands for.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::context::HostContext;
use crate::error::{HostError, HostResult};
use crate::signature::{object_type, ReturnKind};
use crate::value::{HostValue, MethodId, ObjectRef};

/// Class of host strings
pub const STRING_CLASS: &str = "java/lang/String";
/// Class of host lists
pub const LIST_CLASS: &str = "java/util/ArrayList";
/// Class of list iterators
pub const LIST_ITERATOR_CLASS: &str = "java/util/ArrayList$Itr";

/// Body of an in-memory method: `(host, this, args) -> result`
pub type MethodBody = Rc<dyn Fn(&InMemoryHost, ObjectRef, &[HostValue]) -> HostResult<HostValue>>;

/// An exception raised in the in-memory host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrownException {
    /// Class path of the exception
    pub class: String,
    /// Exception message
    pub message: String,
}

struct Method {
    class: usize,
    name: String,
    signature: String,
    body: MethodBody,
}

struct Class {
    name: String,
    methods: Vec<usize>,
    static_fields: HashMap<String, (String, HostValue)>,
}

enum Payload {
    Plain,
    Str(String),
    List(Vec<HostValue>),
    Cursor { list: ObjectRef, next: usize },
}

struct Object {
    class: usize,
    fields: HashMap<String, HostValue>,
    payload: Payload,
}

#[derive(Default)]
struct HostState {
    classes: Vec<Class>,
    class_index: HashMap<String, usize>,
    methods: Vec<Method>,
    objects: Vec<Object>,
    exception: Option<ThrownException>,
    calls: Vec<String>,
    static_reads: usize,
}

impl HostState {
    fn class_id(&mut self, name: &str) -> usize {
        if let Some(&id) = self.class_index.get(name) {
            return id;
        }
        let id = self.classes.len();
        self.classes.push(Class {
            name: name.to_string(),
            methods: Vec::new(),
            static_fields: HashMap::new(),
        });
        self.class_index.insert(name.to_string(), id);
        id
    }

    fn add_method(&mut self, class: usize, name: &str, signature: &str, body: MethodBody) {
        let id = self.methods.len();
        self.methods.push(Method {
            class,
            name: name.to_string(),
            signature: signature.to_string(),
            body,
        });
        // Later definitions shadow earlier ones with the same name and signature.
        self.classes[class].methods.insert(0, id);
    }

    fn alloc(&mut self, class: usize, fields: HashMap<String, HostValue>, payload: Payload) -> ObjectRef {
        let obj = ObjectRef::from_raw(self.objects.len() as u32);
        self.objects.push(Object {
            class,
            fields,
            payload,
        });
        obj
    }

    fn object(&self, obj: ObjectRef) -> HostResult<&Object> {
        self.objects
            .get(obj.to_raw() as usize)
            .ok_or(HostError::InvalidReference(obj.to_raw()))
    }

    fn object_mut(&mut self, obj: ObjectRef) -> HostResult<&mut Object> {
        self.objects
            .get_mut(obj.to_raw() as usize)
            .ok_or(HostError::InvalidReference(obj.to_raw()))
    }
}

/// A managed runtime living entirely in native memory.
pub struct InMemoryHost {
    state: RefCell<HostState>,
}

/// Adds methods to an in-memory class
pub struct ClassBuilder<'h> {
    host: &'h InMemoryHost,
    class: usize,
}

impl ClassBuilder<'_> {
    /// Define a method with an arbitrary body
    pub fn method<F>(self, name: &str, signature: &str, body: F) -> Self
    where
        F: Fn(&InMemoryHost, ObjectRef, &[HostValue]) -> HostResult<HostValue> + 'static,
    {
        self.host
            .state
            .borrow_mut()
            .add_method(self.class, name, signature, Rc::new(body));
        self
    }

    /// Define a method returning the field `field` of the receiver
    pub fn getter(self, name: &str, signature: &str, field: &str) -> Self {
        let field = field.to_string();
        self.method(name, signature, move |host, this, _| host.field(this, &field))
    }
}

impl InMemoryHost {
    /// Create a host with the builtin string and list classes
    pub fn new() -> Self {
        let host = Self {
            state: RefCell::new(HostState::default()),
        };
        host.define_class(STRING_CLASS);
        host.define_class(LIST_CLASS)
            .method("iterator", "()Ljava/util/Iterator;", |host, this, _| {
                host.list_iterator(this).map(HostValue::Object)
            })
            .method("size", "()I", |host, this, _| {
                host.list_items(this).map(|items| HostValue::Int(items.len() as i32))
            });
        host.define_class(LIST_ITERATOR_CLASS)
            .method("hasNext", "()Z", |host, this, _| {
                host.cursor_peek(this).map(|next| HostValue::Bool(next.is_some()))
            })
            .method("next", "()Ljava/lang/Object;", |host, this, _| host.cursor_next(this));
        host
    }

    // ========================================================================
    // Classes and objects
    // ========================================================================

    /// Define a class, or reopen it to add methods
    pub fn define_class(&self, name: &str) -> ClassBuilder<'_> {
        let class = self.state.borrow_mut().class_id(name);
        ClassBuilder { host: self, class }
    }

    /// Define an enum class whose constants answer `name()` and `ordinal()`.
    ///
    /// Each constant is also reachable as a static field typed `L<class>;`.
    pub fn define_enum(&self, class: &str, constants: &[&str]) -> Vec<ObjectRef> {
        self.define_class(class)
            .getter("name", "()Ljava/lang/String;", "name")
            .getter("ordinal", "()I", "ordinal");
        let signature = object_type(class);
        let mut refs = Vec::with_capacity(constants.len());
        for (ordinal, constant) in constants.iter().enumerate() {
            let name = self.new_string(constant);
            let obj = self.new_object(
                class,
                &[
                    ("name", HostValue::Object(name)),
                    ("ordinal", HostValue::Int(ordinal as i32)),
                ],
            );
            self.set_static_field(class, constant, &signature, HostValue::Object(obj));
            refs.push(obj);
        }
        refs
    }

    /// Set a static field of a class
    pub fn set_static_field(&self, class: &str, name: &str, signature: &str, value: HostValue) {
        let mut state = self.state.borrow_mut();
        let id = state.class_id(class);
        state.classes[id]
            .static_fields
            .insert(name.to_string(), (signature.to_string(), value));
    }

    /// Allocate an object of `class` (defined on the fly) with the given fields
    pub fn new_object(&self, class: &str, fields: &[(&str, HostValue)]) -> ObjectRef {
        let mut state = self.state.borrow_mut();
        let class = state.class_id(class);
        let fields = fields
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect();
        state.alloc(class, fields, Payload::Plain)
    }

    /// Allocate a host string
    pub fn new_string(&self, s: &str) -> ObjectRef {
        let mut state = self.state.borrow_mut();
        let class = state.class_id(STRING_CLASS);
        state.alloc(class, HashMap::new(), Payload::Str(s.to_string()))
    }

    /// Allocate an array list holding `items`
    pub fn new_list(&self, items: &[HostValue]) -> ObjectRef {
        let mut state = self.state.borrow_mut();
        let class = state.class_id(LIST_CLASS);
        state.alloc(class, HashMap::new(), Payload::List(items.to_vec()))
    }

    /// Read a field of an object
    pub fn field(&self, obj: ObjectRef, name: &str) -> HostResult<HostValue> {
        let state = self.state.borrow();
        state
            .object(obj)?
            .fields
            .get(name)
            .copied()
            .ok_or_else(|| HostError::Host(format!("object #{} has no field {name}", obj.to_raw())))
    }

    /// Runtime class name of an object
    pub fn class_of(&self, obj: ObjectRef) -> HostResult<String> {
        let state = self.state.borrow();
        let class = state.object(obj)?.class;
        Ok(state.classes[class].name.clone())
    }

    // ========================================================================
    // Exceptions and call log
    // ========================================================================

    /// Raise an exception, as a method body would
    pub fn raise(&self, class: &str, message: &str) {
        self.state.borrow_mut().exception = Some(ThrownException {
            class: class.to_string(),
            message: message.to_string(),
        });
    }

    /// Clear and return the pending exception
    pub fn take_exception(&self) -> Option<ThrownException> {
        self.state.borrow_mut().exception.take()
    }

    /// Every invoked method as `class.name`, in call order
    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    /// Number of invocations of methods named `method`
    pub fn call_count(&self, method: &str) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|call| call.rsplit_once('.').map_or(false, |(_, name)| name == method))
            .count()
    }

    /// Forget the call log
    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Number of static field lookups, successful or not
    pub fn static_field_reads(&self) -> usize {
        self.state.borrow().static_reads
    }

    // ========================================================================
    // Builtin list support
    // ========================================================================

    fn list_items(&self, list: ObjectRef) -> HostResult<Vec<HostValue>> {
        match &self.state.borrow().object(list)?.payload {
            Payload::List(items) => Ok(items.clone()),
            _ => Err(HostError::TypeMismatch {
                expected: "list",
                got: "object",
            }),
        }
    }

    fn list_iterator(&self, list: ObjectRef) -> HostResult<ObjectRef> {
        self.list_items(list)?;
        let mut state = self.state.borrow_mut();
        let class = state.class_id(LIST_ITERATOR_CLASS);
        Ok(state.alloc(class, HashMap::new(), Payload::Cursor { list, next: 0 }))
    }

    fn cursor_peek(&self, cursor: ObjectRef) -> HostResult<Option<HostValue>> {
        let (list, next) = match self.state.borrow().object(cursor)?.payload {
            Payload::Cursor { list, next } => (list, next),
            _ => {
                return Err(HostError::TypeMismatch {
                    expected: "iterator",
                    got: "object",
                })
            }
        };
        Ok(self.list_items(list)?.get(next).copied())
    }

    fn cursor_next(&self, cursor: ObjectRef) -> HostResult<HostValue> {
        match self.cursor_peek(cursor)? {
            Some(value) => {
                let mut state = self.state.borrow_mut();
                if let Payload::Cursor { next, .. } = &mut state.object_mut(cursor)?.payload {
                    *next += 1;
                }
                Ok(value)
            }
            None => {
                self.raise("java/util/NoSuchElementException", "");
                Ok(HostValue::Null)
            }
        }
    }
}

impl Default for InMemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostContext for InMemoryHost {
    fn method_id(&self, obj: ObjectRef, name: &str, signature: &str) -> HostResult<MethodId> {
        let state = self.state.borrow();
        let class = &state.classes[state.object(obj)?.class];
        class
            .methods
            .iter()
            .copied()
            .find(|&id| state.methods[id].name == name && state.methods[id].signature == signature)
            .map(|id| MethodId::from_raw(id as u32))
            .ok_or_else(|| HostError::MethodNotFound {
                class: class.name.clone(),
                name: name.to_string(),
                signature: signature.to_string(),
            })
    }

    fn call_method(&self, obj: ObjectRef, method: MethodId, args: &[HostValue]) -> HostResult<HostValue> {
        let body = {
            let mut state = self.state.borrow_mut();
            let receiver = state.object(obj)?.class;
            let entry = state
                .methods
                .get(method.to_raw() as usize)
                .ok_or_else(|| HostError::Host(format!("unknown method id {}", method.to_raw())))?;
            if entry.class != receiver {
                return Err(HostError::Host(format!(
                    "method {} does not belong to the class of object #{}",
                    entry.name,
                    obj.to_raw()
                )));
            }
            let body = Rc::clone(&entry.body);
            let call = format!("{}.{}", state.classes[entry.class].name, entry.name);
            state.calls.push(call);
            body
        };
        body(self, obj, args)
    }

    fn static_object_field(&self, class_path: &str, name: &str, signature: &str) -> HostResult<HostValue> {
        if ReturnKind::of(&format!("(){signature}")) != Some(ReturnKind::Object) {
            return Err(HostError::TypeMismatch {
                expected: "object",
                got: "primitive",
            });
        }
        let mut state = self.state.borrow_mut();
        state.static_reads += 1;
        let state = &*state;
        let class = state
            .class_index
            .get(class_path)
            .map(|&id| &state.classes[id])
            .ok_or_else(|| HostError::ClassNotFound(class_path.to_string()))?;
        match class.static_fields.get(name) {
            Some((sig, value)) if sig == signature => Ok(*value),
            _ => Err(HostError::FieldNotFound {
                class: class_path.to_string(),
                name: name.to_string(),
                signature: signature.to_string(),
            }),
        }
    }

    fn read_string(&self, string: ObjectRef) -> HostResult<String> {
        match &self.state.borrow().object(string)?.payload {
            Payload::Str(s) => Ok(s.clone()),
            _ => Err(HostError::TypeMismatch {
                expected: "string",
                got: "object",
            }),
        }
    }

    fn create_string(&self, s: &str) -> HostResult<ObjectRef> {
        Ok(self.new_string(s))
    }

    fn throw_new(&self, class_path: &str, message: &str) -> HostResult<()> {
        self.raise(class_path, message);
        Ok(())
    }

    fn exception_pending(&self) -> bool {
        self.state.borrow().exception.is_some()
    }
}
