//! HostContext over a real JVM
//!
//! `JniContext` wraps the `JNIEnv` received by a native method. Local
//! references handed to the bridge (arguments and call results) are kept in
//! an arena for the duration of the native call; [`ObjectRef`]s index into
//! it. Resolved method ids are cached with their return category so that the
//! typed JNI call matching the signature is issued.

use std::cell::RefCell;

use jni::errors::Error as JniError;
use jni::objects::{JClass, JMethodID, JObject, JString, JValue};
use jni::signature::{Primitive, ReturnType};
use jni::sys::jvalue;
use jni::JNIEnv;

use crate::context::HostContext;
use crate::error::{HostError, HostResult};
use crate::signature::ReturnKind;
use crate::value::{HostValue, MethodId, ObjectRef};

/// Host context of one JNI call.
pub struct JniContext<'local> {
    env: RefCell<JNIEnv<'local>>,
    objects: RefCell<Vec<JObject<'local>>>,
    methods: RefCell<Vec<(JMethodID, ReturnKind)>>,
}

fn host_error(err: JniError) -> HostError {
    match err {
        JniError::JavaException => HostError::PendingException,
        other => HostError::Host(other.to_string()),
    }
}

fn return_type(kind: ReturnKind) -> ReturnType {
    match kind {
        ReturnKind::Void => ReturnType::Primitive(Primitive::Void),
        ReturnKind::Boolean => ReturnType::Primitive(Primitive::Boolean),
        ReturnKind::Int => ReturnType::Primitive(Primitive::Int),
        ReturnKind::Long => ReturnType::Primitive(Primitive::Long),
        ReturnKind::Double => ReturnType::Primitive(Primitive::Double),
        ReturnKind::Object => ReturnType::Object,
    }
}

impl<'local> JniContext<'local> {
    /// Wrap the environment of the current native call
    pub fn new(env: JNIEnv<'local>) -> Self {
        Self {
            env: RefCell::new(env),
            objects: RefCell::new(Vec::new()),
            methods: RefCell::new(Vec::new()),
        }
    }

    /// Register a local reference received from the JVM
    pub fn adopt(&self, obj: JObject<'local>) -> HostValue {
        if obj.is_null() {
            return HostValue::Null;
        }
        let mut objects = self.objects.borrow_mut();
        objects.push(obj);
        HostValue::Object(ObjectRef::from_raw((objects.len() - 1) as u32))
    }

    /// Register a string argument
    pub fn adopt_string(&self, string: JString<'local>) -> HostValue {
        self.adopt(JObject::from(string))
    }

    fn clear_exception(env: &mut JNIEnv<'local>) {
        if env.exception_check().unwrap_or(false) {
            let _ = env.exception_clear();
        }
    }

    fn class_name(env: &mut JNIEnv<'local>, class: &JClass<'local>) -> String {
        let name = env
            .call_method(class, "getName", "()Ljava/lang/String;", &[])
            .and_then(|value| value.l())
            .and_then(|obj| {
                let string = JString::from(obj);
                env.get_string(&string).map(String::from)
            });
        match name {
            Ok(name) => name,
            Err(_) => {
                Self::clear_exception(env);
                "<unknown class>".to_string()
            }
        }
    }

    fn to_jvalue(&self, objects: &[JObject<'local>], value: &HostValue) -> HostResult<jvalue> {
        let value = match value {
            HostValue::Bool(b) => JValue::Bool(u8::from(*b)),
            HostValue::Int(i) => JValue::Int(*i),
            HostValue::Long(l) => JValue::Long(*l),
            HostValue::Double(d) => JValue::Double(*d),
            HostValue::Object(obj) => {
                let target = objects
                    .get(obj.to_raw() as usize)
                    .ok_or(HostError::InvalidReference(obj.to_raw()))?;
                return Ok(JValue::Object(target).as_jni());
            }
            HostValue::Null => return Ok(JValue::Object(&JObject::null()).as_jni()),
            HostValue::Void => {
                return Err(HostError::TypeMismatch {
                    expected: "argument",
                    got: "void",
                })
            }
        };
        Ok(value.as_jni())
    }
}

impl HostContext for JniContext<'_> {
    fn method_id(&self, obj: ObjectRef, name: &str, signature: &str) -> HostResult<MethodId> {
        let kind = ReturnKind::of(signature)
            .ok_or_else(|| HostError::Host(format!("unsupported method signature {signature}")))?;
        let objects = self.objects.borrow();
        let target = objects
            .get(obj.to_raw() as usize)
            .ok_or(HostError::InvalidReference(obj.to_raw()))?;
        let mut env = self.env.borrow_mut();
        let class = env.get_object_class(target).map_err(host_error)?;
        match env.get_method_id(&class, name, signature) {
            Ok(id) => {
                let mut methods = self.methods.borrow_mut();
                methods.push((id, kind));
                Ok(MethodId::from_raw((methods.len() - 1) as u32))
            }
            Err(JniError::MethodNotFound { .. }) | Err(JniError::JavaException) => {
                Self::clear_exception(&mut env);
                Err(HostError::MethodNotFound {
                    class: Self::class_name(&mut env, &class),
                    name: name.to_string(),
                    signature: signature.to_string(),
                })
            }
            Err(other) => Err(host_error(other)),
        }
    }

    fn call_method(&self, obj: ObjectRef, method: MethodId, args: &[HostValue]) -> HostResult<HostValue> {
        let (id, kind) = self
            .methods
            .borrow()
            .get(method.to_raw() as usize)
            .copied()
            .ok_or_else(|| HostError::Host(format!("unknown method id {}", method.to_raw())))?;
        let result = {
            let objects = self.objects.borrow();
            let target = objects
                .get(obj.to_raw() as usize)
                .ok_or(HostError::InvalidReference(obj.to_raw()))?;
            let jargs = args
                .iter()
                .map(|arg| self.to_jvalue(&objects, arg))
                .collect::<HostResult<Vec<jvalue>>>()?;
            let mut env = self.env.borrow_mut();
            // SAFETY: `id` was resolved on the runtime class of `target` for a
            // signature whose return category is `kind`.
            unsafe { env.call_method_unchecked(target, id, return_type(kind), &jargs) }
        };
        let value = result.map_err(host_error)?;
        match kind {
            ReturnKind::Void => Ok(HostValue::Void),
            ReturnKind::Boolean => value.z().map(HostValue::Bool).map_err(host_error),
            ReturnKind::Int => value.i().map(HostValue::Int).map_err(host_error),
            ReturnKind::Long => value.j().map(HostValue::Long).map_err(host_error),
            ReturnKind::Double => value.d().map(HostValue::Double).map_err(host_error),
            ReturnKind::Object => {
                let obj = value.l().map_err(host_error)?;
                Ok(self.adopt(obj))
            }
        }
    }

    fn static_object_field(&self, class_path: &str, name: &str, signature: &str) -> HostResult<HostValue> {
        let field = {
            let mut env = self.env.borrow_mut();
            let class = match env.find_class(class_path) {
                Ok(class) => class,
                Err(_) => {
                    Self::clear_exception(&mut env);
                    return Err(HostError::ClassNotFound(class_path.to_string()));
                }
            };
            match env.get_static_field(&class, name, signature).and_then(|v| v.l()) {
                Ok(field) => field,
                Err(_) => {
                    Self::clear_exception(&mut env);
                    return Err(HostError::FieldNotFound {
                        class: class_path.to_string(),
                        name: name.to_string(),
                        signature: signature.to_string(),
                    });
                }
            }
        };
        Ok(self.adopt(field))
    }

    fn read_string(&self, string: ObjectRef) -> HostResult<String> {
        let objects = self.objects.borrow();
        let target = objects
            .get(string.to_raw() as usize)
            .ok_or(HostError::InvalidReference(string.to_raw()))?;
        let string: &JString<'_> = target.into();
        let mut env = self.env.borrow_mut();
        env.get_string(string).map(String::from).map_err(host_error)
    }

    fn create_string(&self, s: &str) -> HostResult<ObjectRef> {
        let string = self.env.borrow_mut().new_string(s).map_err(host_error)?;
        match self.adopt_string(string) {
            HostValue::Object(obj) => Ok(obj),
            _ => Err(HostError::NullValue { expected: "string" }),
        }
    }

    fn throw_new(&self, class_path: &str, message: &str) -> HostResult<()> {
        self.env
            .borrow_mut()
            .throw_new(class_path, message)
            .map_err(host_error)
    }

    fn exception_pending(&self) -> bool {
        self.env.borrow().exception_check().unwrap_or(false)
    }
}
