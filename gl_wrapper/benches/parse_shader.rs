use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gl_wrapper::shader_source::StageSources;

const ANNOTATED: &str = "\
//#type vertex
#version 330 core
layout (location = 0) in vec3 aPos;
layout (location = 1) in vec4 aColor;
layout (location = 2) in vec2 aTexCoords;

uniform mat4 uProjection;
uniform mat4 uView;

out vec4 fColor;
out vec2 fTexCoords;

void main() {
    fColor = aColor;
    fTexCoords = aTexCoords;
    gl_Position = uProjection * uView * vec4(aPos, 1.0);
}

//#type fragment
#version 330 core

uniform float uTime;
uniform sampler2D TEX_SAMPLE;

in vec4 fColor;
in vec2 fTexCoords;

out vec4 color;

void main() {
    color = texture(TEX_SAMPLE, fTexCoords);
}
";

pub fn parse_annotated(c: &mut Criterion) {
    let path = Path::new("default.glsl");

    c.bench_function("parse_annotated", |b| {
        b.iter(|| StageSources::parse(path, black_box(ANNOTATED)))
    });
}

criterion_group!(benches, parse_annotated);
criterion_main!(benches);
