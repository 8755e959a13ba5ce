mod type_annotation;

pub use type_annotation::TypeAnnotation;

#[cfg(test)]
mod tests;
