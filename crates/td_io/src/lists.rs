// crates/td_io/src/lists.rs

//! 终点与体积列表读写
//!
//! 终点列表每行一个 `x,y,z`，体积列表每行一个浮点数。
//! 两份文件按行号一一对应，对应关系由调用方校验。

use crate::error::{IoError, IoResult};
use glam::DVec3;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// 写出终点列表到文件
pub fn write_endpoints(path: &Path, points: &[DVec3]) -> IoResult<()> {
    let file = File::create(path).map_err(|e| IoError::file(path.display().to_string(), e))?;
    let mut writer = BufWriter::new(file);
    write_endpoints_to(&mut writer, points)
        .map_err(|e| IoError::file(path.display().to_string(), e))
}

/// 写出终点列表到任意写入器
pub fn write_endpoints_to<W: Write>(writer: &mut W, points: &[DVec3]) -> std::io::Result<()> {
    for p in points {
        writeln!(writer, "{},{},{}", p.x, p.y, p.z)?;
    }
    writer.flush()
}

/// 从文件读入终点列表
pub fn read_endpoints(path: &Path) -> IoResult<Vec<DVec3>> {
    let file = File::open(path).map_err(|e| IoError::file(path.display().to_string(), e))?;
    read_endpoints_from(BufReader::new(file), &path.display().to_string())
}

/// 从任意读取器读入终点列表
pub fn read_endpoints_from<R: Read>(reader: R, name: &str) -> IoResult<Vec<DVec3>> {
    let reader = BufReader::new(reader);
    let mut points = Vec::new();

    for (lineno, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| IoError::file(name.to_string(), e))?;
        let lineno = lineno + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let parts: Vec<&str> = trimmed.split(',').collect();
        if parts.len() != 3 {
            return Err(IoError::parse(
                name,
                lineno,
                format!("终点应为 x,y,z 三元组: '{trimmed}'"),
            ));
        }
        let mut coords = [0.0; 3];
        for (i, part) in parts.iter().enumerate() {
            coords[i] = part.trim().parse::<f64>().map_err(|_| {
                IoError::parse(name, lineno, format!("无法解析坐标分量: '{part}'"))
            })?;
        }
        points.push(DVec3::from_array(coords));
    }
    Ok(points)
}

/// 写出体积列表到文件
pub fn write_volumes(path: &Path, volumes: &[f64]) -> IoResult<()> {
    let file = File::create(path).map_err(|e| IoError::file(path.display().to_string(), e))?;
    let mut writer = BufWriter::new(file);
    write_volumes_to(&mut writer, volumes).map_err(|e| IoError::file(path.display().to_string(), e))
}

/// 写出体积列表到任意写入器
pub fn write_volumes_to<W: Write>(writer: &mut W, volumes: &[f64]) -> std::io::Result<()> {
    for v in volumes {
        writeln!(writer, "{v}")?;
    }
    writer.flush()
}

/// 从文件读入体积列表
pub fn read_volumes(path: &Path) -> IoResult<Vec<f64>> {
    let file = File::open(path).map_err(|e| IoError::file(path.display().to_string(), e))?;
    read_volumes_from(BufReader::new(file), &path.display().to_string())
}

/// 从任意读取器读入体积列表
///
/// 负体积属于物理上无意义的输入，按解析错误拒绝。
pub fn read_volumes_from<R: Read>(reader: R, name: &str) -> IoResult<Vec<f64>> {
    let reader = BufReader::new(reader);
    let mut volumes = Vec::new();

    for (lineno, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| IoError::file(name.to_string(), e))?;
        let lineno = lineno + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let v = trimmed.parse::<f64>().map_err(|_| {
            IoError::parse(name, lineno, format!("无法解析体积: '{trimmed}'"))
        })?;
        if !v.is_finite() || v < 0.0 {
            return Err(IoError::parse(
                name,
                lineno,
                format!("体积必须为非负有限数: {v}"),
            ));
        }
        volumes.push(v);
    }
    Ok(volumes)
}

/// 写出网格产物名列表（每行一个文件名，供旧式消费端使用）
pub fn write_mesh_names(path: &Path, names: &[String]) -> IoResult<()> {
    let file = File::create(path).map_err(|e| IoError::file(path.display().to_string(), e))?;
    let mut writer = BufWriter::new(file);
    write_mesh_names_to(&mut writer, names).map_err(|e| IoError::file(path.display().to_string(), e))
}

/// 写出网格产物名列表到任意写入器
pub fn write_mesh_names_to<W: Write>(writer: &mut W, names: &[String]) -> std::io::Result<()> {
    for name in names {
        writeln!(writer, "{name}")?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_endpoints_roundtrip() {
        let points = vec![DVec3::new(1.0, 2.0, 3.0), DVec3::new(-0.5, 0.0, 9.25)];
        let mut buf = Vec::new();
        write_endpoints_to(&mut buf, &points).unwrap();
        let loaded = read_endpoints_from(Cursor::new(buf), "mem").unwrap();
        assert_eq!(loaded, points);
    }

    #[test]
    fn test_volumes_roundtrip() {
        let volumes = vec![0.0, 1.5, 2e-3];
        let mut buf = Vec::new();
        write_volumes_to(&mut buf, &volumes).unwrap();
        let loaded = read_volumes_from(Cursor::new(buf), "mem").unwrap();
        assert_eq!(loaded, volumes);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let loaded = read_volumes_from(Cursor::new("1.0\n\n2.0\n"), "mem").unwrap();
        assert_eq!(loaded, vec![1.0, 2.0]);
    }

    #[test]
    fn test_negative_volume_rejected() {
        let err = read_volumes_from(Cursor::new("-1.0\n"), "mem").unwrap_err();
        assert!(matches!(err, IoError::ParseError { line: 1, .. }));
    }

    #[test]
    fn test_malformed_endpoint_rejected() {
        assert!(read_endpoints_from(Cursor::new("1,2\n"), "mem").is_err());
    }

    #[test]
    fn test_mesh_names_one_per_line() {
        let names = vec!["pool_mesh_3.obj".to_string(), "pool_mesh_9.obj".to_string()];
        let mut buf = Vec::new();
        write_mesh_names_to(&mut buf, &names).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "pool_mesh_3.obj\npool_mesh_9.obj\n");
    }
}
