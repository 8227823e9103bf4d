//! Wavefront OBJ export

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::types::UnpackedMesh;

/// Write a mesh as a Wavefront OBJ file with a single named object
pub fn write_obj(mesh: &UnpackedMesh, path: &Path, name: &str) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_obj_to(mesh, &mut writer, name)?;
    writer.flush()
}

/// Write a mesh in OBJ format to any writer
pub fn write_obj_to<W: Write>(mesh: &UnpackedMesh, writer: &mut W, name: &str) -> io::Result<()> {
    writeln!(writer, "# flora-gen")?;
    writeln!(writer, "o {}", name)?;

    for p in &mesh.positions {
        writeln!(writer, "v {:.6} {:.6} {:.6}", p[0], p[1], p[2])?;
    }

    let has_uvs = mesh.uvs.len() == mesh.positions.len() && !mesh.uvs.is_empty();
    if has_uvs {
        for uv in &mesh.uvs {
            writeln!(writer, "vt {:.6} {:.6}", uv[0], uv[1])?;
        }
    }

    for n in &mesh.normals {
        writeln!(writer, "vn {:.6} {:.6} {:.6}", n[0], n[1], n[2])?;
    }

    // OBJ indices are 1-based
    for tri in mesh.indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] + 1, tri[1] + 1, tri[2] + 1);
        if has_uvs {
            writeln!(writer, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
        } else {
            writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::generate_cone;

    #[test]
    fn test_write_obj_counts() {
        let mesh: UnpackedMesh = generate_cone(0.1, 0.3, 6);
        let mut out = Vec::new();
        write_obj_to(&mesh, &mut out, "thorn").unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("o thorn"));
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), mesh.vertex_count());
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), mesh.triangle_count());
        assert!(text.contains("f 1//1"));
    }

    #[test]
    fn test_write_obj_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cone.obj");
        let mesh: UnpackedMesh = generate_cone(0.1, 0.3, 6);

        write_obj(&mesh, &path, "cone").unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# flora-gen"));
    }
}
