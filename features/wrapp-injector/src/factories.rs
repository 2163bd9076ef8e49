use std::{any::type_name, marker::PhantomData, sync::Arc};

use crate::{
    errors::ConstructError,
    types::{DynError, Injectable, Instance},
};

/// A factory constructing a service from its resolved dependencies
///
/// Implemented for every `Fn` with up to 10 parameters implementing [FromInstance]
/// and returning an [Injectable] value. A factory which can fail is wrapped in [Fallible].
///
/// `Args` only marks the parameter list, it lets the same closure type implement
/// the trait for exactly one signature.
pub trait Factory<Args>: Send + Sync + 'static {
    /// Number of parameters, which is the number of dependencies to resolve
    fn arity(&self) -> usize;

    /// Constructs a new instance from one resolved instance per parameter, in order
    fn construct(&self, args: &[Instance]) -> Result<Instance, ConstructError>;
}

/// Types a resolved dependency can be handed to a factory as
pub trait FromInstance: Sized {
    /// Converts the instance, returning the actual stored type name on mismatch
    fn from_instance(instance: &Instance) -> Result<Self, &'static str>;
}

impl<T: Injectable> FromInstance for Arc<T> {
    fn from_instance(instance: &Instance) -> Result<Self, &'static str> {
        instance.downcast()
    }
}

impl FromInstance for Instance {
    fn from_instance(instance: &Instance) -> Result<Self, &'static str> {
        Ok(instance.clone())
    }
}

/// Marks a factory returning `Result<T, E>`
///
/// An `Err` aborts the resolution with [crate::ResolveError::FactoryFailed]
/// and leaves the service unresolved.
pub struct Fallible<F>(pub F);

fn take_arg<'a, T: FromInstance>(
    args: &mut impl Iterator<Item = (usize, &'a Instance)>,
    position: usize,
) -> Result<T, ConstructError> {
    let Some((_, instance)) = args.next() else {
        return Err(ConstructError::Failed(
            format!("argument {position} was not supplied").into(),
        ));
    };
    T::from_instance(instance).map_err(|actual_type| ConstructError::Argument {
        position,
        required_type: type_name::<T>(),
        actual_type,
    })
}

macro_rules! factory_tuple ({ $($param:ident)* } => {
    impl<Func, Ret, $($param,)*> Factory<($($param,)*)> for Func
    where
        Func: Fn($($param),*) -> Ret + Send + Sync + 'static,
        Ret: Injectable,
        $($param: FromInstance + 'static,)*
    {
        fn arity(&self) -> usize {
            <[&str]>::len(&[$(stringify!($param)),*])
        }

        #[allow(non_snake_case, unused_variables, unused_mut, unused_assignments)]
        fn construct(&self, args: &[Instance]) -> Result<Instance, ConstructError> {
            let mut args = args.iter().enumerate();
            let mut position = 0;
            $(
                let $param = take_arg::<$param>(&mut args, position)?;
                position += 1;
            )*
            Ok(Instance::new((self)($($param),*)))
        }
    }

    impl<Func, Ret, Err, $($param,)*> Factory<Fallible<($($param,)*)>> for Fallible<Func>
    where
        Func: Fn($($param),*) -> Result<Ret, Err> + Send + Sync + 'static,
        Ret: Injectable,
        Err: Into<DynError>,
        $($param: FromInstance + 'static,)*
    {
        fn arity(&self) -> usize {
            <[&str]>::len(&[$(stringify!($param)),*])
        }

        #[allow(non_snake_case, unused_variables, unused_mut, unused_assignments)]
        fn construct(&self, args: &[Instance]) -> Result<Instance, ConstructError> {
            let mut args = args.iter().enumerate();
            let mut position = 0;
            $(
                let $param = take_arg::<$param>(&mut args, position)?;
                position += 1;
            )*
            (self.0)($($param),*)
                .map(Instance::new)
                .map_err(|e| ConstructError::Failed(e.into()))
        }
    }
});

factory_tuple! {}
factory_tuple! { A }
factory_tuple! { A B }
factory_tuple! { A B C }
factory_tuple! { A B C D }
factory_tuple! { A B C D E }
factory_tuple! { A B C D E F }
factory_tuple! { A B C D E F G }
factory_tuple! { A B C D E F G H }
factory_tuple! { A B C D E F G H I }
factory_tuple! { A B C D E F G H I J }

/// Object safe wrapper around [Factory], stored in registry entries
pub(crate) trait DynFactory: Send + Sync {
    fn construct(&self, args: &[Instance]) -> Result<Instance, ConstructError>;
}

struct Erased<F, Args> {
    factory: F,
    _args: PhantomData<fn(Args)>,
}

// Impl DynFactory for any Factory
impl<Args: 'static, F: Factory<Args>> DynFactory for Erased<F, Args> {
    fn construct(&self, args: &[Instance]) -> Result<Instance, ConstructError> {
        <F as Factory<Args>>::construct(&self.factory, args)
    }
}

pub(crate) fn erase<Args: 'static, F: Factory<Args>>(factory: F) -> Box<dyn DynFactory> {
    Box::new(Erased {
        factory,
        _args: PhantomData,
    })
}
