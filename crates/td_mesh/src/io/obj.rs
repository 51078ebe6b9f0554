// crates/td_mesh/src/io/obj.rs

//! OBJ 风格网格读写
//!
//! 解析 `v x y z` 顶点行与 `f i j k` 三角形行（1 基索引）。
//! 面 token 允许 `i/t/n` 形式，只取顶点索引部分；
//! 负索引（OBJ 相对索引）与非三角形面视为非法输入。
//!
//! # 示例
//!
//! ```ignore
//! use td_mesh::io::obj::ObjLoader;
//!
//! let mesh = ObjLoader::load("terrain.obj")?;
//! println!("Loaded {} faces", mesh.n_faces());
//! ```

use crate::terrain::TerrainMesh;
use glam::DVec3;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use td_foundation::{TdError, TdResult, Tolerance};

/// OBJ 文件加载器
pub struct ObjLoader;

impl ObjLoader {
    /// 加载 OBJ 文件（默认容差）
    pub fn load<P: AsRef<Path>>(path: P) -> TdResult<TerrainMesh> {
        Self::load_with(path, &Tolerance::default())
    }

    /// 加载 OBJ 文件
    pub fn load_with<P: AsRef<Path>>(path: P, tol: &Tolerance) -> TdResult<TerrainMesh> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TdError::file_not_found(path));
        }
        let file = File::open(path)
            .map_err(|e| TdError::io_with_source(format!("无法打开 {}", path.display()), e))?;
        let reader = BufReader::new(file);
        Self::load_from_reader(reader, path, tol)
    }

    /// 从 reader 加载
    pub fn load_from_reader<R: BufRead>(
        reader: R,
        path: &Path,
        tol: &Tolerance,
    ) -> TdResult<TerrainMesh> {
        let mut vertices: Vec<DVec3> = Vec::new();
        let mut faces: Vec<[u32; 3]> = Vec::new();

        for (lineno, line) in reader.lines().enumerate() {
            let lineno = lineno + 1;
            let line = line.map_err(|e| TdError::io_with_source("读取行失败", e))?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut parts = trimmed.split_whitespace();
            match parts.next() {
                Some("v") => {
                    let coords: Vec<f64> = parts
                        .take(3)
                        .map(|s| s.parse::<f64>())
                        .collect::<Result<_, _>>()
                        .map_err(|e| TdError::parse(path, lineno, format!("顶点坐标非法: {}", e)))?;
                    if coords.len() != 3 {
                        return Err(TdError::parse(path, lineno, "顶点行需要三个坐标"));
                    }
                    vertices.push(DVec3::new(coords[0], coords[1], coords[2]));
                }
                Some("f") => {
                    let idx: Vec<i64> = parts
                        .map(|tok| Self::parse_face_token(tok))
                        .collect::<Result<_, _>>()
                        .map_err(|msg| TdError::parse(path, lineno, msg))?;
                    if idx.len() != 3 {
                        return Err(TdError::parse(
                            path,
                            lineno,
                            format!("仅支持三角形面, 实际 {} 个顶点", idx.len()),
                        ));
                    }
                    let mut face = [0u32; 3];
                    for (k, &i) in idx.iter().enumerate() {
                        if i <= 0 {
                            return Err(TdError::parse(
                                path,
                                lineno,
                                format!("不支持非正顶点索引: {}", i),
                            ));
                        }
                        if i as usize > vertices.len() {
                            return Err(TdError::parse(
                                path,
                                lineno,
                                format!("顶点索引 {} 越界 (当前顶点数 {})", i, vertices.len()),
                            ));
                        }
                        face[k] = (i - 1) as u32;
                    }
                    faces.push(face);
                }
                // vt/vn/g/o/usemtl 等行忽略
                _ => {}
            }
        }

        if vertices.is_empty() {
            return Err(TdError::invalid_mesh(format!(
                "{} 不含顶点",
                path.display()
            )));
        }
        if faces.is_empty() {
            return Err(TdError::invalid_mesh(format!("{} 不含面", path.display())));
        }

        TerrainMesh::from_raw_with(vertices, faces, tol)
    }

    /// 解析面 token，`i`、`i/t`、`i/t/n` 均取顶点索引
    fn parse_face_token(tok: &str) -> Result<i64, String> {
        let head = tok.split('/').next().unwrap_or("");
        head.parse::<i64>()
            .map_err(|_| format!("面索引非法: {:?}", tok))
    }
}

/// OBJ 文件写入器
pub struct ObjWriter;

impl ObjWriter {
    /// 写入网格
    pub fn write<P: AsRef<Path>>(path: P, mesh: &TerrainMesh) -> TdResult<()> {
        let file = File::create(path.as_ref())
            .map_err(|e| TdError::io_with_source("无法创建文件", e))?;
        let mut writer = BufWriter::new(file);
        Self::write_to(&mut writer, mesh.vertices(), mesh.face_index_list())
    }

    /// 写入任意顶点/面列表（供积水边界网格导出复用）
    pub fn write_raw<P: AsRef<Path>>(
        path: P,
        vertices: &[DVec3],
        faces: &[[u32; 3]],
    ) -> TdResult<()> {
        let file = File::create(path.as_ref())
            .map_err(|e| TdError::io_with_source("无法创建文件", e))?;
        let mut writer = BufWriter::new(file);
        Self::write_to(&mut writer, vertices, faces)
    }

    /// 写入到 writer
    pub fn write_to<W: Write>(
        writer: &mut W,
        vertices: &[DVec3],
        faces: &[[u32; 3]],
    ) -> TdResult<()> {
        for v in vertices {
            writeln!(writer, "v {} {} {}", v.x, v.y, v.z)
                .map_err(|e| TdError::io(e.to_string()))?;
        }
        for f in faces {
            writeln!(writer, "f {} {} {}", f[0] + 1, f[1] + 1, f[2] + 1)
                .map_err(|e| TdError::io(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;

    const SIMPLE_OBJ: &str = "\
# simple terrain
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.5
v 0.0 1.0 0.5
f 1 2 3
f 1 3 4
";

    fn load_str(s: &str) -> TdResult<TerrainMesh> {
        ObjLoader::load_from_reader(
            Cursor::new(s),
            &PathBuf::from("test.obj"),
            &Tolerance::default(),
        )
    }

    #[test]
    fn test_load_simple() {
        let mesh = load_str(SIMPLE_OBJ).unwrap();
        assert_eq!(mesh.n_vertices(), 4);
        assert_eq!(mesh.n_faces(), 2);
        assert_eq!(mesh.adjacent_faces(0), &[1]);
    }

    #[test]
    fn test_load_slash_tokens() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/1/1 2/2/2 3/3/3\n";
        let mesh = load_str(obj).unwrap();
        assert_eq!(mesh.n_faces(), 1);
    }

    #[test]
    fn test_negative_index_rejected() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -1 -2 -3\n";
        let err = load_str(obj).unwrap_err();
        assert!(matches!(err, TdError::ParseError { .. }));
    }

    #[test]
    fn test_quad_face_rejected() {
        let obj = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        assert!(load_str(obj).is_err());
    }

    #[test]
    fn test_index_out_of_range_rejected() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n";
        assert!(load_str(obj).is_err());
    }

    #[test]
    fn test_empty_file_rejected() {
        assert!(load_str("# nothing here\n").is_err());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = ObjLoader::load("/no/such/dir/mesh.obj").unwrap_err();
        assert!(matches!(err, TdError::FileNotFound { .. }));
    }

    #[test]
    fn test_roundtrip() {
        let mesh = load_str(SIMPLE_OBJ).unwrap();

        let mut buffer = Vec::new();
        ObjWriter::write_to(&mut buffer, mesh.vertices(), mesh.face_index_list()).unwrap();

        let reloaded = ObjLoader::load_from_reader(
            Cursor::new(buffer),
            &PathBuf::from("roundtrip.obj"),
            &Tolerance::default(),
        )
        .unwrap();

        assert_eq!(reloaded.n_vertices(), mesh.n_vertices());
        assert_eq!(reloaded.n_faces(), mesh.n_faces());
        assert!((reloaded.total_area() - mesh.total_area()).abs() < 1e-12);
    }
}
