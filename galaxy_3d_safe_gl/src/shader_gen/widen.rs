/// Component widening / narrowing of GLSL expressions
///
/// Converting an N-component source to an M-component float target keeps
/// the first `min(N, M)` components in x, y, z, w order and pads the rest
/// with a fill value. A scalar source is replicated to all M components.
/// Integer sources are converted by a float constructor first.

/// Float type with `components` components (`float`, `vec2` .. `vec4`)
pub fn float_type(components: u32) -> &'static str {
    match components {
        1 => "float",
        2 => "vec2",
        3 => "vec3",
        _ => "vec4",
    }
}

/// GLSL float literal (always carries a decimal point or exponent)
pub fn float_literal(value: f32) -> String {
    // Debug keeps ".0" on integral values, unlike Display
    format!("{:?}", value)
}

/// `expr` (with `from` components) as a float value of `to` components
pub fn widen(expr: &str, from: u32, integer: bool, to: u32, fill: f32) -> String {
    let source = if integer {
        format!("{}({})", float_type(from), expr)
    } else {
        expr.to_string()
    };

    if from == to {
        return source;
    }

    // Scalar: constructor replication
    if from == 1 {
        return format!("{}({})", float_type(to), source);
    }

    // Narrowing: swizzle the leading components
    if from > to {
        let swizzle = &"xyzw"[..to as usize];
        return if integer {
            format!("({}).{}", source, swizzle)
        } else {
            format!("{}.{}", source, swizzle)
        };
    }

    let fill = float_literal(fill);
    let padding: Vec<&str> = (from..to).map(|_| fill.as_str()).collect();
    format!("{}({}, {})", float_type(to), source, padding.join(", "))
}

#[cfg(test)]
#[path = "widen_tests.rs"]
mod tests;
